//! Command-line handling for the `pnginator` binary.
//!
//! Options are matched by prefix, like the original tool did, so `--no_zopfli_please` still
//! means `--no_zopfli`. The first two other arguments are the input and output paths; anything
//! after them is ignored.

use crate::{EncoderSettings, Error, Result, DEFAULT_ITERATIONS};
use std::fmt::Write as _;
use std::num::NonZeroU64;
use std::path::PathBuf;

pub const NO_ZOPFLI: &str = "--no_zopfli";
pub const ZOPFLI_ITERATIONS: &str = "--zopfli_iterations=";
pub const NO_BLOCK_SPLITTING: &str = "--no_blocksplitting";
pub const NO_FORMAT_HACKS: &str = "--no_format_hacks";
pub const NO_STATISTICS: &str = "--no_statistics";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub input: PathBuf,
    pub output: PathBuf,
    pub settings: EncoderSettings,
    pub statistics: bool,
}

impl Options {
    /// Parses arguments, not including the program name
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.len() < 2 {
            return Err(Error::Usage("expected an input and an output file".into()));
        }

        let mut settings = EncoderSettings::default();
        let mut statistics = true;
        let mut input = None;
        let mut output = None;

        for arg in args {
            if output.is_some() {
                break;
            }
            if arg.starts_with(NO_ZOPFLI) {
                settings.zlibsettings.set_fallback(true);
            } else if let Some(n) = arg.strip_prefix(ZOPFLI_ITERATIONS) {
                settings.zlibsettings.set_iterations(parse_iterations(n)?);
            } else if arg.starts_with(NO_BLOCK_SPLITTING) {
                settings.zlibsettings.set_block_splitting(false);
            } else if arg.starts_with(NO_FORMAT_HACKS) {
                settings.format_hacks = false;
            } else if arg.starts_with(NO_STATISTICS) {
                statistics = false;
            } else if input.is_none() {
                input = Some(PathBuf::from(arg));
            } else {
                output = Some(PathBuf::from(arg));
            }
        }

        match (input, output) {
            (Some(input), Some(output)) => Ok(Self { input, output, settings, statistics }),
            (None, _) => Err(Error::Usage("missing input file".into())),
            (Some(_), None) => Err(Error::Usage("missing output file".into())),
        }
    }
}

fn parse_iterations(n: &str) -> Result<NonZeroU64> {
    match n.parse::<u64>().map(NonZeroU64::new) {
        Ok(Some(n)) => Ok(n),
        Ok(None) => Err(Error::Usage(format!("{ZOPFLI_ITERATIONS} must be at least 1"))),
        Err(_) => Err(Error::Usage(format!("{ZOPFLI_ITERATIONS} expects a number, got '{n}'"))),
    }
}

/// Help text printed on usage errors
pub fn usage(name: &str) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "Usage: {name} [options] infile.js outfile.png.html");
    let _ = writeln!(s);
    let _ = writeln!(s, "Options:");
    let _ = writeln!(s, "{NO_ZOPFLI}: Use standard zlib deflate instead of zopfli.");
    let _ = writeln!(s, "{ZOPFLI_ITERATIONS}[number]: Number of zopfli iterations. More iterations take");
    let _ = writeln!(s, "  more time but can provide slightly better compression. Default is {DEFAULT_ITERATIONS}.");
    let _ = writeln!(s, "{NO_BLOCK_SPLITTING}: Do not use block splitting.");
    let _ = writeln!(s, "{NO_FORMAT_HACKS}: Do not apply PNG format hacks (omit IEND chunk, custom chunk");
    let _ = writeln!(s, "  overflowing in CRC32, IDAT chunk w/o CRC32).");
    let _ = writeln!(s, "{NO_STATISTICS}: Do not show statistics.");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_only() {
        let o = Options::parse(["in.js", "out.png.html"]).unwrap();
        assert_eq!(o.input, PathBuf::from("in.js"));
        assert_eq!(o.output, PathBuf::from("out.png.html"));
        assert_eq!(o.settings, EncoderSettings::default());
        assert!(o.statistics);
    }

    #[test]
    fn all_flags() {
        let o = Options::parse([
            "--no_zopfli", "--zopfli_iterations=42", "--no_blocksplitting",
            "--no_format_hacks", "--no_statistics", "a", "b",
        ]).unwrap();
        assert!(o.settings.zlibsettings.use_fallback);
        assert_eq!(o.settings.zlibsettings.iterations.get(), 42);
        assert!(!o.settings.zlibsettings.block_splitting);
        assert!(!o.settings.format_hacks);
        assert!(!o.statistics);
    }

    #[test]
    fn flags_between_paths_and_prefix_match() {
        let o = Options::parse(["a", "--no_statistics_at_all", "b"]).unwrap();
        assert!(!o.statistics);
        assert_eq!(o.output, PathBuf::from("b"));
    }

    #[test]
    fn tokens_after_output_ignored() {
        let o = Options::parse(["a", "b", "c", "--no_format_hacks"]).unwrap();
        assert_eq!(o.input, PathBuf::from("a"));
        assert_eq!(o.output, PathBuf::from("b"));
        assert!(o.settings.format_hacks);
    }

    #[test]
    fn missing_paths() {
        assert!(matches!(Options::parse(Vec::<String>::new()), Err(Error::Usage(_))));
        assert!(matches!(Options::parse(["only.js"]), Err(Error::Usage(_))));
        assert!(matches!(Options::parse(["--no_zopfli", "only.js"]), Err(Error::Usage(_))));
        assert!(matches!(Options::parse(["--no_zopfli", "--no_statistics"]), Err(Error::Usage(_))));
    }

    #[test]
    fn bad_iterations() {
        assert!(matches!(Options::parse(["--zopfli_iterations=", "a", "b"]), Err(Error::Usage(_))));
        assert!(matches!(Options::parse(["--zopfli_iterations=x1", "a", "b"]), Err(Error::Usage(_))));
        assert!(matches!(Options::parse(["--zopfli_iterations=0", "a", "b"]), Err(Error::Usage(_))));
    }

    #[test]
    fn usage_lists_options() {
        let u = usage("pnginator");
        assert!(u.starts_with("Usage: pnginator [options]"));
        for opt in [NO_ZOPFLI, ZOPFLI_ITERATIONS, NO_BLOCK_SPLITTING, NO_FORMAT_HACKS, NO_STATISTICS] {
            assert!(u.contains(opt));
        }
    }
}
