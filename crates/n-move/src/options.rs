//! Mover options: the `:set` system.
//!
//! [`MoveOptions`] holds the knobs that shape a move after the text exchange:
//! whether to reindent at all, whether the document is a composite/embedded
//! one (reindent line by line), and the indentation unit the built-in
//! formatter writes. Values are changed with Vim-style `:set` directives.
//!
//! # Supported syntax
//!
//! | Syntax           | Effect                        |
//! |------------------|-------------------------------|
//! | `:set option`    | Enable boolean / show numeric |
//! | `:set nooption`  | Disable boolean               |
//! | `:set option!`   | Toggle boolean                |
//! | `:set option?`   | Query current value           |
//! | `:set option=N`  | Assign numeric value          |
//! | `:set`           | Show changed options          |
//! | `:set all`       | Show all options              |
//!
//! # Option names
//!
//! | Full name     | Abbrev | Type    | Default |
//! |---------------|--------|---------|---------|
//! | `reindent`    | `ri`   | bool    | true    |
//! | `embeddeddoc` | `emb`  | bool    | false   |
//! | `shiftwidth`  | `sw`   | integer | 4       |
//! | `tabstop`     | `ts`   | integer | 4       |
//! | `expandtab`   | `et`   | bool    | true    |

use crate::error::OptionError;

/// A parsed `:set` directive.
///
/// Produced by [`parse_set`] from the arguments to `:set`. [`MoveOptions::apply`]
/// interprets these to read or modify option values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option` - enable a boolean option.
    On(String),

    /// `:set nooption` - disable a boolean option.
    Off(String),

    /// `:set option!` - toggle a boolean option.
    Toggle(String),

    /// `:set option?` - query the current value.
    Query(String),

    /// `:set option=value` - assign a value.
    Assign(String, String),

    /// `:set` with no arguments - show changed options.
    ShowChanged,

    /// `:set all` - show all options.
    ShowAll,
}

/// Resolve a full name or abbreviation to the option's full name.
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    match name {
        "reindent" | "ri" => Some("reindent"),
        "embeddeddoc" | "emb" => Some("embeddeddoc"),
        "shiftwidth" | "sw" => Some("shiftwidth"),
        "tabstop" | "ts" => Some("tabstop"),
        "expandtab" | "et" => Some("expandtab"),
        _ => None,
    }
}

/// Returns `true` if `name` is a known boolean option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(
        canonical_name(name),
        Some("reindent" | "embeddeddoc" | "expandtab")
    )
}

/// Returns `true` if `name` is a known numeric option (full name or abbreviation).
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    matches!(canonical_name(name), Some("shiftwidth" | "tabstop"))
}

/// Returns `true` if `name` is any known option.
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    canonical_name(name).is_some()
}

/// Parse the full `:set` arguments string into directives.
///
/// Multiple space-separated arguments are supported (`:set sw=2 noet`).
/// An empty argument string produces [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // `noexpandtab` → Off("expandtab"), but only for a known boolean, so an
    // option whose own name starts with "no" is never split.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    // A bare numeric option name shows its value.
    if is_numeric_option(arg) {
        return SetDirective::Query(arg.to_string());
    }

    SetDirective::On(arg.to_string())
}

/// Format a boolean option for display: `"name"` when true, `"noname"` when
/// false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// MoveOptions
// ---------------------------------------------------------------------------

/// Knobs for what happens around a line swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    /// Ask the formatter to reindent the moved block.
    pub reindent: bool,
    /// The document is composite/embedded: reindent one line at a time.
    pub embedded_document: bool,
    /// Columns per indentation level. `0` means "use `tabstop`".
    pub shiftwidth: usize,
    /// Columns a tab occupies. Never zero.
    pub tabstop: usize,
    /// Indent with spaces instead of tabs.
    pub expandtab: bool,
}

impl MoveOptions {
    /// Option names in display order.
    const NAMES: [&'static str; 5] = [
        "reindent",
        "embeddeddoc",
        "shiftwidth",
        "tabstop",
        "expandtab",
    ];

    /// Defaults with a list of `:set` arguments applied on top.
    ///
    /// # Errors
    ///
    /// Returns the first [`OptionError`] hit while applying the directives.
    pub fn from_set(args: &str) -> Result<Self, OptionError> {
        let mut options = Self::default();
        for directive in parse_set(args) {
            options.apply(&directive)?;
        }
        Ok(options)
    }

    /// The indentation width actually used (Vim's `shiftwidth=0` rule).
    #[inline]
    #[must_use]
    pub const fn effective_shiftwidth(&self) -> usize {
        if self.shiftwidth == 0 {
            self.tabstop
        } else {
            self.shiftwidth
        }
    }

    /// The whitespace that indents to `columns` under these options.
    ///
    /// With `expandtab` this is all spaces; otherwise as many tabs as fit,
    /// padded with spaces.
    #[must_use]
    pub fn indent_string(&self, columns: usize) -> String {
        if self.expandtab {
            return " ".repeat(columns);
        }
        let mut s = "\t".repeat(columns / self.tabstop);
        s.push_str(&" ".repeat(columns % self.tabstop));
        s
    }

    /// Current value of an option, formatted the way `:set option?` shows it.
    /// Returns `None` for unknown names.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<String> {
        let full = canonical_name(name)?;
        let shown = match full {
            "reindent" => format_bool(full, self.reindent),
            "embeddeddoc" => format_bool(full, self.embedded_document),
            "expandtab" => format_bool(full, self.expandtab),
            "shiftwidth" => format!("{full}={}", self.shiftwidth),
            "tabstop" => format!("{full}={}", self.tabstop),
            _ => return None,
        };
        Some(shown)
    }

    /// Apply one directive.
    ///
    /// Returns `Some(text)` for directives that display something (queries,
    /// `:set`, `:set all`), `None` for ones that only change state.
    ///
    /// # Errors
    ///
    /// - [`OptionError::Unknown`] for names that are not options.
    /// - [`OptionError::NotBoolean`] when toggling/negating a numeric option.
    /// - [`OptionError::InvalidValue`] for values that don't parse or are out
    ///   of range (`tabstop=0`, `reindent=3`).
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::On(name) => self.set_bool(name, |_| true).map(|()| None),
            SetDirective::Off(name) => self.set_bool(name, |_| false).map(|()| None),
            SetDirective::Toggle(name) => self.set_bool(name, |v| !v).map(|()| None),
            SetDirective::Query(name) => self
                .value_of(name)
                .map(Some)
                .ok_or_else(|| OptionError::Unknown(name.clone())),
            SetDirective::Assign(name, value) => self.assign(name, value).map(|()| None),
            SetDirective::ShowChanged => Ok(Some(self.show(true))),
            SetDirective::ShowAll => Ok(Some(self.show(false))),
        }
    }

    fn bool_slot(&mut self, name: &str) -> Result<&mut bool, OptionError> {
        match canonical_name(name) {
            Some("reindent") => Ok(&mut self.reindent),
            Some("embeddeddoc") => Ok(&mut self.embedded_document),
            Some("expandtab") => Ok(&mut self.expandtab),
            Some(_) => Err(OptionError::NotBoolean(name.to_string())),
            None => Err(OptionError::Unknown(name.to_string())),
        }
    }

    fn set_bool(&mut self, name: &str, f: impl FnOnce(bool) -> bool) -> Result<(), OptionError> {
        let slot = self.bool_slot(name)?;
        *slot = f(*slot);
        Ok(())
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let invalid = || OptionError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        if !is_known_option(name) {
            return Err(OptionError::Unknown(name.to_string()));
        }
        if is_bool_option(name) {
            let parsed = match value {
                "1" | "true" | "on" => true,
                "0" | "false" | "off" => false,
                _ => return Err(invalid()),
            };
            return self.set_bool(name, |_| parsed);
        }

        let number: usize = value.parse().map_err(|_| invalid())?;
        match canonical_name(name) {
            Some("shiftwidth") => self.shiftwidth = number,
            Some("tabstop") if number > 0 => self.tabstop = number,
            Some("tabstop") => return Err(invalid()),
            _ => return Err(OptionError::Unknown(name.to_string())),
        }
        Ok(())
    }

    /// Space-separated option listing, optionally only the non-default ones.
    fn show(&self, changed_only: bool) -> String {
        let defaults = Self::default();
        Self::NAMES
            .iter()
            .filter_map(|name| {
                let value = self.value_of(name)?;
                let unchanged = defaults.value_of(name).as_deref() == Some(value.as_str());
                (!changed_only || !unchanged).then_some(value)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            reindent: true,
            embedded_document: false,
            shiftwidth: 4,
            tabstop: 4,
            expandtab: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
