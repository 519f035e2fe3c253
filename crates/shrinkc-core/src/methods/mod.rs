//! The transformation catalogue: one submodule per method name in the
//! Method Registry.

mod blanks;
mod crc;
mod del_args;
mod indent;
mod move_func;
mod parens_brackets;
mod replace_regex;
mod shorten_ints;
mod ternary;

pub use blanks::{AllBlanks, Blanks};
pub use crc::Crc;
pub use del_args::DelArgs;
pub use indent::{Indent, Pretty};
pub use move_func::MoveFunc;
pub use parens_brackets::{BracketPair, Brackets, Parens};
pub use replace_regex::ReplaceRegex;
pub use shorten_ints::ShortenInts;
pub use ternary::Ternary;
