use std::fmt::Display;
use std::str::FromStr;

use lazy_regex::regex_captures;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("`{0}` doesn't look like a sticker pack URL")]
pub struct PackRefError(pub String);

/// Canonical short name of a sticker pack, as used in `t.me/addstickers/<name>` links
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortName(String);

impl ShortName {
    /// Accepts a bare short name, a short name with a `.json` suffix or a full
    /// `[http(s)://](t|telegram).(me|dog)/addstickers/<name>[.json]` link.
    pub fn parse(input: &str) -> Option<ShortName> {
        let (_, name) = regex_captures!(
            r"^(?:(?:https?://)?(?:t|telegram)\.(?:me|dog)/addstickers/)?([A-Za-z0-9_-]+)(?:\.json)?$",
            input
        )?;
        Some(ShortName(name.to_string()))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ShortName {
    type Err = PackRefError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input).ok_or_else(|| PackRefError(input.to_string()))
    }
}

impl Display for ShortName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses every reference or none: the first invalid one fails the whole batch.
pub fn parse_all<I>(inputs: I) -> Result<Vec<ShortName>, PackRefError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    inputs
        .into_iter()
        .map(|input| input.as_ref().parse::<ShortName>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(input: &str) -> Option<String> {
        ShortName::parse(input).map(|n| n.as_str().to_string())
    }

    #[test]
    fn accepts_links_and_bare_names() {
        assert_eq!(name("foo_pack").as_deref(), Some("foo_pack"));
        assert_eq!(name("foo_pack.json").as_deref(), Some("foo_pack"));
        assert_eq!(
            name("https://t.me/addstickers/foo_pack").as_deref(),
            Some("foo_pack")
        );
        assert_eq!(
            name("http://telegram.dog/addstickers/Foo-Pack.json").as_deref(),
            Some("Foo-Pack")
        );
        assert_eq!(name("t.me/addstickers/abc123").as_deref(), Some("abc123"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(name("not a url"), None);
        assert_eq!(name(""), None);
        assert_eq!(name("https://example.com/addstickers/foo"), None);
        assert_eq!(name("https://t.me/addstickers/"), None);
        assert_eq!(name("ftp://t.me/addstickers/foo"), None);
    }

    #[test]
    fn batch_fails_on_first_invalid() {
        let err = parse_all(["good", "bad one", "also_good"]).unwrap_err();
        assert_eq!(err, PackRefError("bad one".to_string()));

        let names = parse_all(["a", "https://t.me/addstickers/b"]).unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[1].as_str(), "b");
    }
}
