// src/convert/languages.rs
//! The fixed code-language vocabulary the platform accepts.
//!
//! Lookup is case-insensitive and alias-aware; anything that still misses
//! normalizes to the plain-text fallback so a code block is never rejected
//! for its language tag.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Every language tag the blocks API accepts, verbatim.
pub static SUPPORTED_LANGUAGES: &[&str] = &[
    "abap",
    "arduino",
    "bash",
    "basic",
    "c",
    "clojure",
    "coffeescript",
    "c++",
    "c#",
    "css",
    "dart",
    "diff",
    "docker",
    "elixir",
    "elm",
    "erlang",
    "flow",
    "fortran",
    "f#",
    "gherkin",
    "glsl",
    "go",
    "graphql",
    "groovy",
    "haskell",
    "html",
    "java",
    "javascript",
    "json",
    "julia",
    "kotlin",
    "latex",
    "less",
    "lisp",
    "livescript",
    "lua",
    "makefile",
    "markdown",
    "markup",
    "matlab",
    "mermaid",
    "nix",
    "objective-c",
    "ocaml",
    "pascal",
    "perl",
    "php",
    "plain text",
    "powershell",
    "prolog",
    "protobuf",
    "python",
    "r",
    "reason",
    "ruby",
    "rust",
    "sass",
    "scala",
    "scheme",
    "scss",
    "shell",
    "sql",
    "swift",
    "typescript",
    "vb.net",
    "verilog",
    "vhdl",
    "visual basic",
    "webassembly",
    "xml",
    "yaml",
];

/// Common spellings that are not valid tags but map to one.
static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("js", "javascript"),
        ("jsx", "javascript"),
        ("node", "javascript"),
        ("ts", "typescript"),
        ("tsx", "typescript"),
        ("py", "python"),
        ("python3", "python"),
        ("rb", "ruby"),
        ("rs", "rust"),
        ("sh", "shell"),
        ("zsh", "shell"),
        ("console", "shell"),
        ("golang", "go"),
        ("cpp", "c++"),
        ("cxx", "c++"),
        ("cs", "c#"),
        ("csharp", "c#"),
        ("objc", "objective-c"),
        ("objectivec", "objective-c"),
        ("dockerfile", "docker"),
        ("yml", "yaml"),
        ("htm", "html"),
        ("md", "markdown"),
        ("tex", "latex"),
        ("text", "plain text"),
        ("txt", "plain text"),
        ("plaintext", "plain text"),
        ("plain", "plain text"),
        ("kt", "kotlin"),
        ("pgsql", "sql"),
        ("postgres", "sql"),
        ("mysql", "sql"),
        ("wasm", "webassembly"),
        ("vb", "visual basic"),
    ])
});

/// Resolve a raw language tag to its canonical platform spelling, if any.
pub fn normalize(raw: &str) -> Option<&'static str> {
    let lowered = raw.trim().to_lowercase();
    if let Some(&canonical) = SUPPORTED_LANGUAGES
        .iter()
        .find(|&&candidate| candidate == lowered)
    {
        return Some(canonical);
    }
    ALIASES.get(lowered.as_str()).copied()
}

/// Whether a tag is already in canonical form.
pub fn is_supported(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tags_pass_through() {
        assert_eq!(normalize("rust"), Some("rust"));
        assert_eq!(normalize("plain text"), Some("plain text"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(normalize("Rust"), Some("rust"));
        assert_eq!(normalize("PYTHON"), Some("python"));
    }

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(normalize("js"), Some("javascript"));
        assert_eq!(normalize("cpp"), Some("c++"));
        assert_eq!(normalize("yml"), Some("yaml"));
        assert_eq!(normalize("txt"), Some("plain text"));
    }

    #[test]
    fn test_unknown_is_none() {
        assert_eq!(normalize("brainfuck"), None);
        assert!(!is_supported("brainfuck"));
    }
}
