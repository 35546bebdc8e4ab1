//! Single-pass placeholder expansion.
//!
//! Token grammar, with `$` standing for the configured indicator:
//!
//! - `${key}`: braced form. The key is every character up to the next `}`.
//!   An empty (`${}`) or unterminated braced token is copied literally.
//! - `$key`: bare form. The key is the longest run of ASCII alphanumerics and
//!   `_`. The character that ends it is then read as ordinary input, so a
//!   second indicator starts a new token.
//! - An indicator followed by anything else, or by the end of input, is copied
//!   literally.
//!
//! Keys without a value are handled by [`UnresolvedPolicy`]: `Keep` copies the
//! token text unchanged, `Fail` stops with [`UnresolvedKey`].

use tessera_config::UnresolvedPolicy;
use thiserror::Error;
use tracing::warn;

use crate::properties::PropertyBag;

/// A placeholder key had no value under [`UnresolvedPolicy::Fail`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no value for placeholder '{0}'")]
pub struct UnresolvedKey(pub String);

#[derive(Debug)]
enum State {
    Literal,
    AfterIndicator,
    BracedKey(String),
    BareKey(String),
}

#[derive(Debug, Clone, Copy)]
enum Form {
    Braced,
    Bare,
}

/// Replaces placeholder tokens introduced by one indicator character.
#[derive(Debug, Clone, Copy)]
pub struct Expander {
    indicator: char,
    policy: UnresolvedPolicy,
}

impl Expander {
    /// Expander for `indicator` with the given unresolved key handling.
    #[must_use]
    pub const fn new(indicator: char, policy: UnresolvedPolicy) -> Self {
        Self { indicator, policy }
    }

    /// Expand every placeholder in `input`.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvedKey`] for the first key without a value when the
    /// policy is [`UnresolvedPolicy::Fail`].
    pub fn expand(&self, input: &str, properties: &PropertyBag) -> Result<String, UnresolvedKey> {
        let mut out = String::with_capacity(input.len());
        self.expand_into(input.chars(), properties, &mut out)?;
        Ok(out)
    }

    /// Expand a character stream into `out`, consuming it exactly once.
    ///
    /// # Errors
    ///
    /// Same as [`Expander::expand`]; `out` holds the text expanded so far.
    pub fn expand_into<I>(
        &self,
        input: I,
        properties: &PropertyBag,
        out: &mut String,
    ) -> Result<(), UnresolvedKey>
    where
        I: IntoIterator<Item = char>,
    {
        let mut state = State::Literal;
        for ch in input {
            state = self.step(state, ch, properties, out)?;
        }
        self.finish(state, properties, out)
    }

    fn step(
        &self,
        state: State,
        ch: char,
        properties: &PropertyBag,
        out: &mut String,
    ) -> Result<State, UnresolvedKey> {
        match state {
            State::Literal => Ok(self.literal(ch, out)),
            State::AfterIndicator => {
                if ch == '{' {
                    Ok(State::BracedKey(String::new()))
                } else if is_key_char(ch) {
                    Ok(State::BareKey(String::from(ch)))
                } else {
                    out.push(self.indicator);
                    Ok(self.literal(ch, out))
                }
            }
            State::BracedKey(mut key) => {
                if ch != '}' {
                    key.push(ch);
                    return Ok(State::BracedKey(key));
                }
                if key.is_empty() {
                    out.push(self.indicator);
                    out.push_str("{}");
                } else {
                    self.resolve(&key, Form::Braced, properties, out)?;
                }
                Ok(State::Literal)
            }
            State::BareKey(mut key) => {
                if is_key_char(ch) {
                    key.push(ch);
                    return Ok(State::BareKey(key));
                }
                self.resolve(&key, Form::Bare, properties, out)?;
                Ok(self.literal(ch, out))
            }
        }
    }

    fn literal(&self, ch: char, out: &mut String) -> State {
        if ch == self.indicator {
            State::AfterIndicator
        } else {
            out.push(ch);
            State::Literal
        }
    }

    fn finish(
        &self,
        state: State,
        properties: &PropertyBag,
        out: &mut String,
    ) -> Result<(), UnresolvedKey> {
        match state {
            State::Literal => {}
            State::AfterIndicator => out.push(self.indicator),
            State::BracedKey(key) => {
                out.push(self.indicator);
                out.push('{');
                out.push_str(&key);
            }
            State::BareKey(key) => self.resolve(&key, Form::Bare, properties, out)?,
        }
        Ok(())
    }

    fn resolve(
        &self,
        key: &str,
        form: Form,
        properties: &PropertyBag,
        out: &mut String,
    ) -> Result<(), UnresolvedKey> {
        if let Some(value) = properties.get(key) {
            out.push_str(value);
            return Ok(());
        }
        match self.policy {
            UnresolvedPolicy::Fail => Err(UnresolvedKey(key.to_string())),
            UnresolvedPolicy::Keep => {
                out.push(self.indicator);
                match form {
                    Form::Braced => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                    Form::Bare => out.push_str(key),
                }
                Ok(())
            }
        }
    }
}

const fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Expands output name patterns; never fails.
#[derive(Debug, Clone, Copy)]
pub struct NameExpander {
    inner: Expander,
}

impl NameExpander {
    /// Name expander for `indicator`.
    #[must_use]
    pub const fn new(indicator: char, policy: UnresolvedPolicy) -> Self {
        Self {
            inner: Expander::new(indicator, policy),
        }
    }

    /// Expanded file name, or `pattern` itself when expansion fails.
    #[must_use]
    pub fn expand(&self, pattern: &str, properties: &PropertyBag) -> String {
        self.inner
            .expand(pattern, properties)
            .unwrap_or_else(|err| {
                warn!(
                    pattern,
                    error = %err,
                    "output name expansion failed; using pattern verbatim"
                );
                pattern.to_string()
            })
    }
}
