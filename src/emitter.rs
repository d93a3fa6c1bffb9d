// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary to the physical transport.
//!
//! The engine hands every resolved payload to a [`CommandEmitter`]. How the
//! payload becomes an IR/RF burst or a network request is up to the
//! implementation.

use std::future::Future;
use std::sync::Arc;

use crate::error::EmitError;
use crate::types::Payload;

/// Sends resolved payloads to the transport.
///
/// The engine calls [`emit`](Self::emit) once per observed transition and
/// never retries. The switch state is updated before the call, whatever its
/// outcome.
///
/// # Examples
///
/// ```
/// use smart_switch::CommandEmitter;
/// use smart_switch::error::EmitError;
/// use smart_switch::types::Payload;
///
/// #[derive(Debug)]
/// struct LogEmitter;
///
/// impl CommandEmitter for LogEmitter {
///     async fn emit(&self, payload: &Payload) -> Result<(), EmitError> {
///         println!("sending {payload}");
///         Ok(())
///     }
/// }
/// ```
pub trait CommandEmitter: Send + Sync + 'static {
    /// Sends `payload` to the transport.
    ///
    /// # Errors
    ///
    /// Returns `EmitError` if the transport fails or rejects the payload.
    fn emit(&self, payload: &Payload) -> impl Future<Output = Result<(), EmitError>> + Send;
}

impl<E: CommandEmitter> CommandEmitter for Arc<E> {
    fn emit(&self, payload: &Payload) -> impl Future<Output = Result<(), EmitError>> + Send {
        (**self).emit(payload)
    }
}
