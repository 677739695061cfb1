//! Manifest runner and bootstrap helpers behind the `satdsl` binary.
//!
//! A manifest is a YAML list of steps applied strictly in file order:
//!
//! ```yaml
//! - ensure: organization
//!   attrs: { name: Default Organization }
//!   register: org
//! - ensure: lifecycle_environment
//!   attrs: { name: Dev, organization: "@org" }
//! ```
//!
//! A string starting with `@` refers to the entity registered under that
//! label by an earlier step. Write `@@` for a literal leading `@`.

mod answers;
mod error;
mod manifest;

pub use answers::{ForemanAnswers, DEFAULT_ANSWERS_FILE};
pub use error::{CliError, CliResult};
pub use manifest::{Applied, Manifest, Step, apply, resolve_attrs};
