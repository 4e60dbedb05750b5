//! Lexical path helpers and relative reference rewriting.
//!
//! Component paths are handled as strings with `/` separators, resolved
//! without touching the filesystem, so a merged component can point at the
//! same files its base pointed at.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::path::{Component, Path, PathBuf};

lazy_static! {
    /// `src="./x"` / `src='./x'` in markup.
    pub static ref MARKUP_SRC_REGEX: Regex =
        Regex::new(r#"(?i)\s+(?:src="(\.[^"]+)"|src='(\.[^']+)')"#).unwrap();

    /// `url(./x)` in CSS, quoted or not.
    pub static ref CSS_URL_REGEX: Regex =
        Regex::new(r#"(?i)url\s*\(\s*(?:['"])?(\.[^"']+)(?:['"])?\)"#).unwrap();

    /// `import ... from './x'`, `import './x'` and `require('./x')`.
    pub static ref JS_PATH_REGEX: Regex = Regex::new(
        r#"(?im)(?: |^)(?:(?:from|import)\s+(?:["'](\.[^"']+)["'])|require\s*\(\s*["'](\.[^"']+)["']\s*\))"#
    )
    .unwrap();

    static ref LEADING_WORD_REGEX: Regex = Regex::new(r"^(\w)").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// LEXICAL PATH OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolves `.` and `..` segments without touching the filesystem.
///
/// `..` above the root is dropped; leading `..` of a relative path is kept.
/// An empty result is `"."`.
pub fn normalize(path: &Path) -> String {
    let mut components: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    if components.is_empty() {
        return ".".to_string();
    }
    let result: PathBuf = components.iter().collect();
    to_slash(&result)
}

/// Joins two path fragments and normalizes the result.
///
/// The second fragment is always appended, even when it starts with `/`.
pub fn join(base: &str, path: &str) -> String {
    let tail = path.trim_start_matches('/');
    if base.is_empty() {
        return normalize(Path::new(tail));
    }
    normalize(&Path::new(base).join(tail))
}

/// The directory part of a path; `"."` when there is none.
pub fn dirname(path: &str) -> String {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => to_slash(parent),
        Some(_) => ".".to_string(),
        None if path.starts_with('/') => "/".to_string(),
        None => ".".to_string(),
    }
}

fn absolute(path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        return PathBuf::from(normalize(path));
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    PathBuf::from(normalize(&cwd.join(path)))
}

/// The relative path that leads from `from` to `to`; empty when they match.
pub fn relative(from: &str, to: &str) -> String {
    let from = absolute(from);
    let to = absolute(to);
    let from_parts: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..from_parts.len() {
        segments.push("..".to_string());
    }
    for part in &to_parts[common..] {
        segments.push(part.as_os_str().to_string_lossy().to_string());
    }
    segments.join("/")
}

// ═══════════════════════════════════════════════════════════════════════════════
// REFERENCE REWRITING
// ═══════════════════════════════════════════════════════════════════════════════

/// Rewrites every relative path captured by `expression` so it is resolved from
/// `directory` instead of the code's original location.
///
/// The expression captures the path in group 1 or group 2. Rewritten paths that
/// do not start with `.` get a `./` prefix.
pub fn update_paths(code: &str, expression: &Regex, directory: &str) -> String {
    expression
        .replace_all(code, |caps: &Captures| {
            let statement = &caps[0];
            let Some(item_path) = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()) else {
                return statement.to_string();
            };
            let joined = join(directory, item_path);
            let new_path = LEADING_WORD_REGEX.replace(&joined, "./$1");
            statement.replacen(item_path, &new_path, 1)
        })
        .into_owned()
}

pub fn update_css_paths(css: &str, directory: &str) -> String {
    update_paths(css, &CSS_URL_REGEX, directory)
}

pub fn update_js_paths(js: &str, directory: &str) -> String {
    update_paths(js, &JS_PATH_REGEX, directory)
}

/// Markup gets both `src` attributes and inline CSS `url()` references rewritten.
pub fn update_markup_paths(markup: &str, directory: &str) -> String {
    update_css_paths(&update_paths(markup, &MARKUP_SRC_REGEX, directory), directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), "/a/c/d");
        assert_eq!(normalize(Path::new("../a/../../b")), "../../b");
        assert_eq!(normalize(Path::new("/../a")), "/a");
        assert_eq!(normalize(Path::new("./")), ".");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/components", "./base.svelte"), "/components/base.svelte");
        assert_eq!(join("/a/b", "../c/base.svelte"), "/a/c/base.svelte");
        assert_eq!(join("", "./x.png"), "x.png");
        assert_eq!(join("../base", "./x.png"), "../base/x.png");
        assert_eq!(join(".", "x"), "x");
    }

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("/a/b/c.svelte"), "/a/b");
        assert_eq!(dirname("c.svelte"), ".");
        assert_eq!(dirname("/c.svelte"), "/");
    }

    #[test]
    fn test_relative() {
        assert_eq!(relative("/a/target", "/a/base"), "../base");
        assert_eq!(relative("/a", "/a/b/c"), "b/c");
        assert_eq!(relative("/a/b", "/a/b"), "");
        assert_eq!(relative("/x/y/z", "/a"), "../../../a");
    }

    #[test]
    fn test_update_js_paths() {
        let js = "import Button from './Button.svelte';\n\
                  const x = require('../lib/x');\n\
                  import 'svelte';";
        let updated = update_js_paths(js, "../base");
        assert!(updated.contains("from '../base/Button.svelte'"));
        assert!(updated.contains("require('../lib/x')"));
        assert!(updated.contains("import 'svelte'"));
    }

    #[test]
    fn test_update_paths_same_directory_prefixes_dot() {
        let css = "a { background: url('./img/bg.png'); }";
        assert_eq!(update_css_paths(css, ""), "a { background: url('./img/bg.png'); }");
        let css = "a { background: url(./img/bg.png); }";
        assert_eq!(update_css_paths(css, "sub"), "a { background: url(./sub/img/bg.png); }");
    }

    #[test]
    fn test_update_markup_paths() {
        let markup = r#"<img src="./logo.png"><div style="background: url(./bg.png)"></div>"#;
        let updated = update_markup_paths(markup, "../shared");
        assert!(updated.contains(r#"src="../shared/logo.png""#));
        assert!(updated.contains("url(../shared/bg.png)"));
    }

    #[test]
    fn test_rewrite_round_trip_resolves_same_target() {
        let dir_a = "/project/src/base";
        let dir_b = "/project/src/pages/deep";
        let to_b = relative(dir_b, dir_a);
        let in_b = update_markup_paths(r#" src="./x.png""#, &to_b);
        let to_a = relative(dir_a, dir_b);
        let back_in_a = update_markup_paths(&in_b, &to_a);

        let rewritten = MARKUP_SRC_REGEX.captures(&back_in_a).unwrap()[1].to_string();
        assert_eq!(join(dir_a, &rewritten), join(dir_a, "./x.png"));
        let intermediate = MARKUP_SRC_REGEX.captures(&in_b).unwrap()[1].to_string();
        assert_eq!(join(dir_b, &intermediate), join(dir_a, "./x.png"));
    }
}
