//! Main module for the propsheet expansion engine

pub mod context;
pub mod error;
pub mod lexing;
pub mod location;
pub mod odometer;
pub mod parsing;
pub mod permutation;
pub mod resolver;
pub mod route;
pub mod testing;
pub mod value;

pub use context::ValueContext;
pub use error::{ExpandError, ExpandResult};
pub use lexing::{detokenize, tokenize, Token, TokenKind};
pub use location::SourceLocation;
pub use odometer::{permutations, Axis, Permutations};
pub use parsing::{BodyParser, RouteParser};
pub use permutation::Permutation;
pub use resolver::AxisSet;
pub use route::Route;
pub use value::{Collection, Expansion, Instruction, ObjectExpansion, Scalar, Value};
