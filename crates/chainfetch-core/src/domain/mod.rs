//! Domain value types shared by every fetcher.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | One trimmed ticker token |
//! | [`Credentials`] | Host-supplied secrets, redacted in `Debug` |

mod credentials;
mod symbol;

pub use credentials::Credentials;
pub use symbol::Symbol;
