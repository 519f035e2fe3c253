//! Pure reduction engine: buffer, pattern matchers, and the transformation
//! catalogue. This crate never touches the filesystem or spawns a process —
//! the oracle trial and the external pretty-printer are both abstracted
//! behind traits ([`trial::TrialRunner`], [`methods::Pretty`]) implemented
//! by `shrinkc-oracle`.

pub mod buffer;
pub mod driver;
pub mod error;
pub mod method;
pub mod methods;
pub mod patterns;
pub mod trial;

pub use buffer::Buffer;
pub use driver::Registry;
pub use error::CoreError;
pub use method::{Method, MethodId, MethodStats};
pub use trial::{attempt, whitespace_equivalent, TrialRunner};

/// Build a [`Registry`] containing every method, wired with the given
/// pretty-printer collaborator for `indent`. Callers that only want a
/// subset (via `--<method>` flags) filter [`MethodId::all`] themselves and
/// construct a [`Registry`] directly from the methods they keep.
pub fn full_registry<P: methods::Pretty + 'static>(pretty: P) -> Registry {
    let all: Vec<Box<dyn Method>> = vec![
        Box::new(methods::Parens),
        Box::new(methods::Brackets),
        Box::new(methods::ReplaceRegex::new()),
        Box::new(methods::Blanks),
        Box::new(methods::AllBlanks),
        Box::new(methods::Ternary),
        Box::new(methods::ShortenInts),
        Box::new(methods::Crc),
        Box::new(methods::MoveFunc),
        Box::new(methods::DelArgs::new()),
        Box::new(methods::Indent::new(pretty)),
    ];
    Registry::new(all)
}
