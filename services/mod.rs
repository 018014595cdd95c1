/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! External collaborator contracts: the auth service and the HTTP transport
//! envelope it speaks.

pub mod auth;
pub mod transport;
