//! Configuration options for decoding and encoding.
//!
//! Both directions take an immutable per-call options struct:
//!
//! - [`DecodeOptions`]: string decoding mode and nesting limit
//! - [`EncodeOptions`]: date/time formats, fallback resolver, nesting limit
//!
//! ## Examples
//!
//! ```rust
//! use jsonx::{decode_with_options, encode_with_options, DecodeOptions, EncodeOptions, Value};
//! use chrono::NaiveDate;
//!
//! let options = DecodeOptions::new().with_max_depth(16);
//! let value = decode_with_options("[1, 2, 3]", options).unwrap();
//!
//! let date = Value::from(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
//! let options = EncodeOptions::new().with_date_format("%d/%m/%Y");
//! assert_eq!(encode_with_options(&date, options).unwrap(), "\"15/01/2024\"");
//! ```

use std::fmt;
use std::rc::Rc;

use crate::{EncodeError, Value};

/// Default nesting limit for both decoding and encoding.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default strftime format for [`Value::Date`].
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default strftime format for [`Value::Time`].
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Fallback resolver invoked for values the encoder cannot represent.
///
/// The resolver receives the unencodable value and returns a replacement
/// [`Value`], which is encoded in its place. An `Err` aborts encoding
/// with [`EncodeError::CallbackFailed`].
///
/// [`EncodeError::CallbackFailed`]: crate::EncodeError::CallbackFailed
pub type Fallback = Rc<dyn Fn(&Value) -> Result<Value, String>>;

/// Configuration for [`decode_with_options`](crate::decode_with_options).
///
/// # Examples
///
/// ```rust
/// use jsonx::DecodeOptions;
///
/// let options = DecodeOptions::new()
///     .with_force_unicode(true)
///     .with_max_depth(64);
/// assert_eq!(options.max_depth, 64);
/// ```
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Run the escape-decoding pass even for strings without backslashes.
    pub force_unicode: bool,
    /// Maximum container nesting depth before decoding fails.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            force_unicode: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the escape-decoding pass for every string.
    ///
    /// Decoded output is identical either way; this only disables the
    /// verbatim fast path for strings that contain no backslash.
    #[must_use]
    pub fn with_force_unicode(mut self, force_unicode: bool) -> Self {
        self.force_unicode = force_unicode;
        self
    }

    /// Sets the maximum container nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Configuration for [`encode_with_options`](crate::encode_with_options).
///
/// # Examples
///
/// ```rust
/// use jsonx::{EncodeOptions, Value};
///
/// let options = EncodeOptions::new()
///     .with_date_format("%Y/%m/%d")
///     .with_fallback(|_value| Ok(Value::Null));
/// assert_eq!(options.date_format, "%Y/%m/%d");
/// ```
#[derive(Clone)]
pub struct EncodeOptions {
    /// Resolver for values with no JSON representation, if any.
    pub fallback: Option<Fallback>,
    /// strftime format for [`Value::Date`].
    pub date_format: String,
    /// strftime format for [`Value::Time`].
    pub time_format: String,
    /// strftime format for [`Value::DateTime`]. When `None`, the date and
    /// time formats are joined with a space.
    pub datetime_format: Option<String>,
    /// Maximum value nesting depth before encoding fails.
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            fallback: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            datetime_format: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback resolver for unencodable values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonx::{EncodeOptions, Value};
    ///
    /// let options = EncodeOptions::new()
    ///     .with_fallback(|value| Ok(Value::from(format!("{value:?}"))));
    /// ```
    #[must_use]
    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + 'static,
    {
        self.fallback = Some(Rc::new(fallback));
        self
    }

    /// Sets the strftime format used for [`Value::Date`].
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Sets the strftime format used for [`Value::Time`].
    #[must_use]
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// Sets the strftime format used for [`Value::DateTime`].
    #[must_use]
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = Some(format.into());
        self
    }

    /// Sets the maximum value nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The effective datetime format: the configured one, or the date and
    /// time formats joined with a space.
    #[must_use]
    pub fn effective_datetime_format(&self) -> String {
        match &self.datetime_format {
            Some(format) => format.clone(),
            None => format!("{} {}", self.date_format, self.time_format),
        }
    }

    pub(crate) fn run_fallback(&self, value: &Value) -> Option<Result<Value, EncodeError>> {
        self.fallback
            .as_ref()
            .map(|resolver| resolver(value).map_err(EncodeError::CallbackFailed))
    }
}

impl fmt::Debug for EncodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeOptions")
            .field("fallback", &self.fallback.as_ref().map(|_| "<resolver>"))
            .field("date_format", &self.date_format)
            .field("time_format", &self.time_format)
            .field("datetime_format", &self.datetime_format)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
