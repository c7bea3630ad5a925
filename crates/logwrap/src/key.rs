use std::any::type_name;
use std::borrow::Cow;
use std::fmt;

/// Fully-qualified type name used to select a logger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
    pub fn of<T: ?Sized>() -> Self {
        TypeKey(Cow::Borrowed(type_name::<T>()))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        TypeKey(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeKey {
    fn from(name: &'static str) -> Self {
        TypeKey(Cow::Borrowed(name))
    }
}

impl From<String> for TypeKey {
    fn from(name: String) -> Self {
        TypeKey(Cow::Owned(name))
    }
}

/// Which logger a call should go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggerKey {
    /// The logger registered under the empty name.
    UseDefault,
    /// Derive the key from the calling location.
    AutoDetect,
    Explicit(TypeKey),
}

impl LoggerKey {
    pub fn of<T: ?Sized>() -> Self {
        LoggerKey::Explicit(TypeKey::of::<T>())
    }

    /// Key used when the caller gave none.
    pub fn implicit(auto_detect: bool) -> Self {
        if auto_detect {
            LoggerKey::AutoDetect
        } else {
            LoggerKey::UseDefault
        }
    }
}

impl From<TypeKey> for LoggerKey {
    fn from(key: TypeKey) -> Self {
        LoggerKey::Explicit(key)
    }
}
