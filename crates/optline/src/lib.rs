//! Declarative command-line option parsing.
//!
//! Declare options once with [`OptDef`], collect them (and any mutually
//! exclusive [`OptGroup`]s) in a [`Catalog`], then run [`parse`] over argv.
//! The result lists matched options in the order they appeared, along with
//! leftover positional arguments.
//!
//! ```
//! use optline::{Catalog, OptDef, parse};
//!
//! let catalog = Catalog::new()
//!     .option(OptDef::short("v").long("verbose").build()?)?
//!     .option(OptDef::short("o").long("output").has_arg().build()?)?;
//!
//! let argv = ["-vo", "out.txt", "input.txt"];
//! let result = parse(&catalog, &argv)?;
//! assert!(result.has_option("verbose"));
//! assert_eq!(result.value("output"), Some("out.txt"));
//! assert_eq!(result.leftovers(), &["input.txt"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The catalog is never mutated by parsing, so one catalog can serve any
//! number of parses.

pub mod catalog;
pub mod error;
pub mod group;
pub mod help;
pub mod option;
pub mod parser;
pub mod result;

pub use catalog::{Catalog, GroupId, GroupRef, NameKind};
pub use error::{ConfigError, ErrorKind, Missing, ParseError};
pub use group::OptGroup;
pub use help::HelpFormatter;
pub use option::{
    Arity, DEFAULT_ARG_NAME, LONG_PREFIX, OptDef, OptDefBuilder, SHORT_PREFIX, VALUE_SEPARATOR,
};
pub use parser::{ParseSettings, parse, parse_args, parse_with};
pub use result::{Matched, ParseResult};
