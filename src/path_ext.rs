//! Slash-separated path helpers for OSC addresses and URL-like strings.
//!
//! These work on plain strings rather than `std::path::Path` because OSC
//! addresses always use `/` regardless of platform.

use std::sync::LazyLock;

use regex::Regex;

// A segment followed by one or more slashes and `..`
static PARENT_BACKTRACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^/]*)?/+\.\.").expect("static regex"));

pub trait PathExt {
    /// The parent directory, e.g. `"/foo/bar/baz"` gives `"/foo/bar"`.
    fn parent(&self) -> Option<&str>;
    /// The last component with its extension, e.g. `"/foo/bar/baz.txt"` gives `"baz.txt"`.
    fn file(&self) -> Option<&str>;
    /// The last component without its extension.
    fn file_name(&self) -> Option<&str>;
    /// The extension of the last component, without the dot.
    fn extension(&self) -> Option<&str>;
    /// Collapse duplicate slashes and resolve `..` components.
    ///
    /// `"/foo///bar/baz/../thing.txt"` gives `"/foo/bar/thing.txt"`.
    fn cleaned_path(&self) -> String;
    /// Append each path with a `/` separator and clean the result.
    ///
    /// `"/foo".joining(["bar/", "../baz.txt"])` gives `"/foo/baz.txt"`.
    fn joining<I, S>(&self, paths: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>;
}

/// Drops a single trailing slash so `"/foo/bar/"` behaves like `"/foo/bar"`.
fn without_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}

fn collapse_slashes(s: &mut String) {
    while s.contains("//") {
        *s = s.replace("//", "/");
    }
}

impl PathExt for str {
    fn parent(&self) -> Option<&str> {
        let trimmed = without_trailing_slash(self);
        trimmed.rfind('/').map(|idx| &trimmed[..idx])
    }

    fn file(&self) -> Option<&str> {
        let trimmed = without_trailing_slash(self);
        trimmed.rfind('/').map(|idx| &trimmed[idx + 1..])
    }

    fn file_name(&self) -> Option<&str> {
        let file = self.file()?;
        Some(file.rfind('.').map_or(file, |idx| &file[..idx]))
    }

    fn extension(&self) -> Option<&str> {
        let file = self.file()?;
        file.rfind('.').map(|idx| &file[idx + 1..])
    }

    fn cleaned_path(&self) -> String {
        let mut path = self.to_string();
        collapse_slashes(&mut path);
        while let Some(m) = PARENT_BACKTRACK.find(&path) {
            path.replace_range(m.range(), "");
            collapse_slashes(&mut path);
        }
        path
    }

    fn joining<I, S>(&self, paths: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = self.to_string();
        joined.join(paths);
        joined
    }
}

/// In-place variants for owned strings.
pub trait PathExtMut {
    fn clean_path(&mut self);
    fn join<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>;
}

impl PathExtMut for String {
    fn clean_path(&mut self) {
        *self = self.as_str().cleaned_path();
    }

    fn join<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.push('/');
            self.push_str(path.as_ref());
        }
        self.clean_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent() {
        assert_eq!("/foo/bar/baz".parent(), Some("/foo/bar"));
        assert_eq!("/foo/bar/".parent(), Some("/foo"));
        assert_eq!("/foo".parent(), Some(""));
        assert_eq!("foo".parent(), None);
    }

    #[test]
    fn test_file() {
        assert_eq!("/foo/bar/baz.txt".file(), Some("baz.txt"));
        assert_eq!("/foo/bar/".file(), Some("bar"));
        assert_eq!("baz.txt".file(), None);
    }

    #[test]
    fn test_file_name_and_extension() {
        assert_eq!("/foo/bar/baz.txt".file_name(), Some("baz"));
        assert_eq!("/foo/bar/baz.txt".extension(), Some("txt"));
        assert_eq!("/foo/archive.tar.gz".file_name(), Some("archive.tar"));
        assert_eq!("/foo/archive.tar.gz".extension(), Some("gz"));
        assert_eq!("/foo/bar".file_name(), Some("bar"));
        assert_eq!("/foo/bar".extension(), None);
        assert_eq!("bar.txt".extension(), None);
    }

    #[test]
    fn test_cleaned_path() {
        assert_eq!("/foo///bar/baz/../thing.txt".cleaned_path(), "/foo/bar/thing.txt");
        assert_eq!("/a/b/c/../../d".cleaned_path(), "/a/d");
        assert_eq!("/../x".cleaned_path(), "/x");
        assert_eq!("/already/clean".cleaned_path(), "/already/clean");
    }

    #[test]
    fn test_joining() {
        assert_eq!("/foo".joining(["bar/", "../baz.txt"]), "/foo/baz.txt");
        assert_eq!("/avatar/parameters".joining(["VRCEmote"]), "/avatar/parameters/VRCEmote");
        assert_eq!("/avatar/parameters".joining(["../input/Jump"]), "/avatar/input/Jump");
    }

    #[test]
    fn test_in_place() {
        let mut path = String::from("/foo//bar");
        path.clean_path();
        assert_eq!(path, "/foo/bar");

        let mut base = String::from("/foo");
        base.join(vec!["bar".to_string(), "..".to_string(), "baz".to_string()]);
        assert_eq!(base, "/foo/baz");
    }
}
