//! Typed parameters for endpoint inputs.
//!
//! Query strings and bodies are deserialized into these types before they
//! reach a controller, so handlers only ever see well-formed input.

pub(crate) mod publish;
