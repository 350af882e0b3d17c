//! Command line argument validation.
//!
//! Arguments are a flat token list. Each of `-f`, `-i`, `-l` and `-s` takes
//! the token right after it as its value; everything else is ignored. Every
//! token is inspected, so a value that looks like a flag is also read as one.

use crate::error::ArgumentError;
use dms_logging::Flag;

/// The four paths the program runs with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    /// `-f`: files waiting to be filed
    pub source_dir: String,
    /// `-i`: JSON index of the filing system
    pub index_file: String,
    /// `-l`: event log
    pub log_file: String,
    /// `-s`: sorted storage
    pub storage_dir: String,
}

impl ParsedArguments {
    /// Collect flag values without checking that they are all present.
    ///
    /// A repeated flag keeps its last value. A flag in final position has no
    /// value and leaves the field untouched.
    pub fn scan<S: AsRef<str>>(args: &[S]) -> Self {
        let mut parsed = Self::default();
        for pair in args.windows(2) {
            if let Some(flag) = Flag::from_token(pair[0].as_ref()) {
                *parsed.slot(flag) = pair[1].as_ref().to_string();
            }
        }
        parsed
    }

    /// Report the first missing value in `-f`, `-i`, `-l`, `-s` order.
    pub fn check(&self) -> Result<(), ArgumentError> {
        match Flag::ALL.into_iter().find(|flag| self.get(*flag).is_empty()) {
            Some(flag) => Err(ArgumentError::Missing(flag)),
            None => Ok(()),
        }
    }

    pub fn get(&self, flag: Flag) -> &str {
        match flag {
            Flag::Source => &self.source_dir,
            Flag::Index => &self.index_file,
            Flag::Log => &self.log_file,
            Flag::Storage => &self.storage_dir,
        }
    }

    fn slot(&mut self, flag: Flag) -> &mut String {
        match flag {
            Flag::Source => &mut self.source_dir,
            Flag::Index => &mut self.index_file,
            Flag::Log => &mut self.log_file,
            Flag::Storage => &mut self.storage_dir,
        }
    }
}

/// Parse `args` and require all four values.
pub fn validate<S: AsRef<str>>(args: &[S]) -> Result<ParsedArguments, ArgumentError> {
    let parsed = ParsedArguments::scan(args);
    parsed.check()?;
    Ok(parsed)
}
