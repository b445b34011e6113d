//! Preference data types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{PreferenceError, Result};

/// Tag identifying one privacy option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    /// Whether the location may be used to search for playgrounds.
    #[serde(rename = "playgrounds")]
    EnablePlaygroundSearch,
    /// Whether the location may be used for walking directions.
    #[serde(rename = "navigation")]
    EnableNavigation,
    /// Whether the location may be reverse-geocoded into an address.
    #[serde(rename = "addresses")]
    EnableAddressLookup,
    /// Minimum reported accuracy radius in meters (`0` = no floor).
    #[serde(rename = "accuracy")]
    AccuracyFloorMeters,
    /// Minimum seconds between device fixes (`0` = always refresh).
    #[serde(rename = "interval")]
    MinRefreshIntervalSeconds,
}

/// How an option is presented on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionGroup {
    /// Enables a feature that consumes the location.
    UseCase,
    /// Tunes how the location is collected.
    Preference,
}

/// Value type carried by an option kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDataType {
    /// `true`/`false` flag.
    Boolean,
    /// Non-negative number.
    Number,
}

impl OptionKind {
    /// Every defined kind, in canonical order.
    pub const ALL: [Self; 5] = [
        Self::EnablePlaygroundSearch,
        Self::EnableNavigation,
        Self::EnableAddressLookup,
        Self::AccuracyFloorMeters,
        Self::MinRefreshIntervalSeconds,
    ];

    /// Returns the serialized name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnablePlaygroundSearch => "playgrounds",
            Self::EnableNavigation => "navigation",
            Self::EnableAddressLookup => "addresses",
            Self::AccuracyFloorMeters => "accuracy",
            Self::MinRefreshIntervalSeconds => "interval",
        }
    }

    /// Returns the settings group of this kind.
    #[must_use]
    pub const fn group(self) -> OptionGroup {
        match self {
            Self::EnablePlaygroundSearch | Self::EnableNavigation | Self::EnableAddressLookup => {
                OptionGroup::UseCase
            }
            Self::AccuracyFloorMeters | Self::MinRefreshIntervalSeconds => OptionGroup::Preference,
        }
    }

    /// Returns the value type carried by this kind.
    #[must_use]
    pub const fn data_type(self) -> OptionDataType {
        match self.group() {
            OptionGroup::UseCase => OptionDataType::Boolean,
            OptionGroup::Preference => OptionDataType::Number,
        }
    }

    /// Returns the inclusive `(min, max)` range for numeric kinds.
    ///
    /// | Kind       | Range        |
    /// |------------|--------------|
    /// | `accuracy` | 0 - 1000 m   |
    /// | `interval` | 0 - 1800 s   |
    #[must_use]
    pub const fn range(self) -> Option<(f64, f64)> {
        match self {
            Self::AccuracyFloorMeters => Some((0.0, 1000.0)),
            Self::MinRefreshIntervalSeconds => Some((0.0, 1800.0)),
            _ => None,
        }
    }

    /// Returns the default option for this kind.
    #[must_use]
    pub const fn default_option(self) -> PrivacyOption {
        match self {
            Self::EnablePlaygroundSearch => PrivacyOption::EnablePlaygroundSearch(true),
            Self::EnableNavigation => PrivacyOption::EnableNavigation(false),
            Self::EnableAddressLookup => PrivacyOption::EnableAddressLookup(false),
            Self::AccuracyFloorMeters => PrivacyOption::AccuracyFloorMeters(0.0),
            Self::MinRefreshIntervalSeconds => PrivacyOption::MinRefreshIntervalSeconds(0.0),
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::EnablePlaygroundSearch => 0,
            Self::EnableNavigation => 1,
            Self::EnableAddressLookup => 2,
            Self::AccuracyFloorMeters => 3,
            Self::MinRefreshIntervalSeconds => 4,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single privacy option with a value of the type its kind implies.
///
/// Serialized as `{"kind": "<name>", "value": <bool|number>}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PrivacyOption {
    /// See [`OptionKind::EnablePlaygroundSearch`].
    #[serde(rename = "playgrounds")]
    EnablePlaygroundSearch(bool),
    /// See [`OptionKind::EnableNavigation`].
    #[serde(rename = "navigation")]
    EnableNavigation(bool),
    /// See [`OptionKind::EnableAddressLookup`].
    #[serde(rename = "addresses")]
    EnableAddressLookup(bool),
    /// See [`OptionKind::AccuracyFloorMeters`].
    #[serde(rename = "accuracy")]
    AccuracyFloorMeters(f64),
    /// See [`OptionKind::MinRefreshIntervalSeconds`].
    #[serde(rename = "interval")]
    MinRefreshIntervalSeconds(f64),
}

impl PrivacyOption {
    /// Returns the kind of this option.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        match self {
            Self::EnablePlaygroundSearch(_) => OptionKind::EnablePlaygroundSearch,
            Self::EnableNavigation(_) => OptionKind::EnableNavigation,
            Self::EnableAddressLookup(_) => OptionKind::EnableAddressLookup,
            Self::AccuracyFloorMeters(_) => OptionKind::AccuracyFloorMeters,
            Self::MinRefreshIntervalSeconds(_) => OptionKind::MinRefreshIntervalSeconds,
        }
    }

    /// Returns the flag value for boolean kinds.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::EnablePlaygroundSearch(v)
            | Self::EnableNavigation(v)
            | Self::EnableAddressLookup(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the numeric value for number kinds.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match *self {
            Self::AccuracyFloorMeters(v) | Self::MinRefreshIntervalSeconds(v) => Some(v),
            _ => None,
        }
    }

    /// Checks that a numeric value is finite and inside its kind's range.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::OutOfRange`] for a rejected value.
    pub fn validate(&self) -> Result<()> {
        let (Some(value), Some((min, max))) = (self.as_number(), self.kind().range()) else {
            return Ok(());
        };
        if value.is_finite() && (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(PreferenceError::OutOfRange {
                kind: self.kind(),
                value,
            })
        }
    }
}

/// A use case that may be switched off by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseCase {
    /// Searching for nearby playgrounds.
    PlaygroundSearch,
    /// Walking directions to a playground.
    Navigation,
    /// Showing the address of the current position.
    AddressLookup,
}

impl UseCase {
    /// Every use case.
    pub const ALL: [Self; 3] = [Self::PlaygroundSearch, Self::Navigation, Self::AddressLookup];

    /// Returns the option kind gating this use case.
    #[must_use]
    pub const fn kind(self) -> OptionKind {
        match self {
            Self::PlaygroundSearch => OptionKind::EnablePlaygroundSearch,
            Self::Navigation => OptionKind::EnableNavigation,
            Self::AddressLookup => OptionKind::EnableAddressLookup,
        }
    }
}

/// The complete set of privacy options, exactly one per [`OptionKind`].
///
/// Options are kept in [`OptionKind::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PreferenceSet {
    options: Vec<PrivacyOption>,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            options: OptionKind::ALL
                .iter()
                .map(|kind| kind.default_option())
                .collect(),
        }
    }
}

impl PreferenceSet {
    /// Builds a set from a list of options.
    ///
    /// Kinds missing from `options` take their default value.
    ///
    /// # Errors
    ///
    /// - [`PreferenceError::Empty`] if `options` is empty
    /// - [`PreferenceError::DuplicateKind`] if a kind appears twice
    /// - [`PreferenceError::OutOfRange`] if a numeric value is rejected
    pub fn from_options(options: Vec<PrivacyOption>) -> Result<Self> {
        if options.is_empty() {
            return Err(PreferenceError::Empty);
        }

        let mut slots: [Option<PrivacyOption>; 5] = [None; 5];
        for option in options {
            option.validate()?;
            let slot = &mut slots[option.kind().index()];
            if slot.is_some() {
                return Err(PreferenceError::DuplicateKind(option.kind()));
            }
            *slot = Some(option);
        }

        let options = OptionKind::ALL
            .iter()
            .zip(slots)
            .map(|(kind, slot)| slot.unwrap_or_else(|| kind.default_option()))
            .collect();

        Ok(Self { options })
    }

    /// Returns a copy of this set with one option replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::OutOfRange`] if the new value is rejected.
    pub fn with_option(&self, option: PrivacyOption) -> Result<Self> {
        option.validate()?;
        let mut options = self.options.clone();
        options[option.kind().index()] = option;
        Ok(Self { options })
    }

    /// Returns the option for `kind`.
    #[must_use]
    pub fn get(&self, kind: OptionKind) -> Option<&PrivacyOption> {
        self.options.iter().find(|option| option.kind() == kind)
    }

    /// Iterates over the options in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &PrivacyOption> {
        self.options.iter()
    }

    /// Returns the number of options (always one per kind).
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Returns whether `use_case` is enabled.
    #[must_use]
    pub fn is_enabled(&self, use_case: UseCase) -> bool {
        self.get(use_case.kind())
            .and_then(PrivacyOption::as_bool)
            .unwrap_or(false)
    }

    /// Returns the accuracy floor in meters.
    #[must_use]
    pub fn accuracy_floor_meters(&self) -> f64 {
        self.number(OptionKind::AccuracyFloorMeters)
    }

    /// Returns the minimum refresh interval in seconds.
    #[must_use]
    pub fn min_refresh_interval_seconds(&self) -> f64 {
        self.number(OptionKind::MinRefreshIntervalSeconds)
    }

    fn number(&self, kind: OptionKind) -> f64 {
        self.get(kind)
            .and_then(PrivacyOption::as_number)
            .unwrap_or(0.0)
    }

    /// Parses the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the options are rejected
    /// by [`from_options`](Self::from_options).
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Vec<PrivacyOption> = serde_json::from_str(json)?;
        Self::from_options(options)
    }

    /// Encodes this set as a flat JSON list of `{kind, value}` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_one_option_per_kind() {
        let set = PreferenceSet::default();
        assert_eq!(set.len(), OptionKind::ALL.len());
        for kind in OptionKind::ALL {
            assert_eq!(set.get(kind).map(PrivacyOption::kind), Some(kind));
        }
    }

    #[test]
    fn default_values() {
        let set = PreferenceSet::default();
        assert!(set.is_enabled(UseCase::PlaygroundSearch));
        assert!(!set.is_enabled(UseCase::Navigation));
        assert!(!set.is_enabled(UseCase::AddressLookup));
        assert!(set.accuracy_floor_meters().abs() < f64::EPSILON);
        assert!(set.min_refresh_interval_seconds().abs() < f64::EPSILON);
    }

    #[test]
    fn kind_groups_and_data_types() {
        assert_eq!(OptionKind::EnableNavigation.group(), OptionGroup::UseCase);
        assert_eq!(OptionKind::AccuracyFloorMeters.group(), OptionGroup::Preference);
        assert_eq!(
            OptionKind::EnableAddressLookup.data_type(),
            OptionDataType::Boolean
        );
        assert_eq!(
            OptionKind::MinRefreshIntervalSeconds.data_type(),
            OptionDataType::Number
        );
        assert_eq!(OptionKind::EnablePlaygroundSearch.range(), None);
    }

    #[test]
    fn default_option_matches_kind() {
        for kind in OptionKind::ALL {
            assert_eq!(kind.default_option().kind(), kind);
        }
    }

    #[test]
    fn option_accessors_match_value_type() {
        assert_eq!(PrivacyOption::EnableNavigation(true).as_bool(), Some(true));
        assert_eq!(PrivacyOption::EnableNavigation(true).as_number(), None);
        assert_eq!(PrivacyOption::AccuracyFloorMeters(50.0).as_number(), Some(50.0));
        assert_eq!(PrivacyOption::AccuracyFloorMeters(50.0).as_bool(), None);
    }

    #[test]
    fn from_options_fills_missing_kinds_with_defaults() {
        let set =
            PreferenceSet::from_options(vec![PrivacyOption::AccuracyFloorMeters(250.0)]).unwrap();

        assert_eq!(set.len(), OptionKind::ALL.len());
        assert!((set.accuracy_floor_meters() - 250.0).abs() < f64::EPSILON);
        assert!(set.is_enabled(UseCase::PlaygroundSearch));
    }

    #[test]
    fn from_options_keeps_canonical_order() {
        let set = PreferenceSet::from_options(vec![
            PrivacyOption::MinRefreshIntervalSeconds(30.0),
            PrivacyOption::EnablePlaygroundSearch(false),
        ])
        .unwrap();

        let kinds: Vec<OptionKind> = set.iter().map(PrivacyOption::kind).collect();
        assert_eq!(kinds, OptionKind::ALL.to_vec());
    }

    #[test]
    fn from_options_rejects_empty() {
        assert!(matches!(
            PreferenceSet::from_options(Vec::new()),
            Err(PreferenceError::Empty)
        ));
    }

    #[test]
    fn from_options_rejects_duplicates() {
        let result = PreferenceSet::from_options(vec![
            PrivacyOption::EnableNavigation(true),
            PrivacyOption::EnableNavigation(false),
        ]);
        assert!(matches!(
            result,
            Err(PreferenceError::DuplicateKind(OptionKind::EnableNavigation))
        ));
    }

    #[test]
    fn from_options_rejects_out_of_range_numbers() {
        for option in [
            PrivacyOption::AccuracyFloorMeters(-1.0),
            PrivacyOption::AccuracyFloorMeters(1000.5),
            PrivacyOption::MinRefreshIntervalSeconds(1801.0),
            PrivacyOption::MinRefreshIntervalSeconds(f64::NAN),
            PrivacyOption::AccuracyFloorMeters(f64::INFINITY),
        ] {
            assert!(
                matches!(
                    PreferenceSet::from_options(vec![option]),
                    Err(PreferenceError::OutOfRange { .. })
                ),
                "{option:?} should be rejected"
            );
        }
    }

    #[test]
    fn range_boundaries_are_accepted() {
        assert!(PrivacyOption::AccuracyFloorMeters(0.0).validate().is_ok());
        assert!(PrivacyOption::AccuracyFloorMeters(1000.0).validate().is_ok());
        assert!(PrivacyOption::MinRefreshIntervalSeconds(1800.0).validate().is_ok());
    }

    #[test]
    fn with_option_replaces_single_value() {
        let set = PreferenceSet::default()
            .with_option(PrivacyOption::EnableNavigation(true))
            .unwrap();

        assert!(set.is_enabled(UseCase::Navigation));
        assert!(set.is_enabled(UseCase::PlaygroundSearch));
        assert_eq!(set.len(), OptionKind::ALL.len());
    }

    #[test]
    fn with_option_rejects_out_of_range() {
        let result = PreferenceSet::default().with_option(PrivacyOption::AccuracyFloorMeters(-5.0));
        assert!(result.is_err());
    }

    #[test]
    fn json_uses_kind_value_pairs() {
        let json = PreferenceSet::default().to_json().unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains(r#"{"kind":"playgrounds","value":true}"#));
        assert!(json.contains(r#"{"kind":"interval","value":0.0}"#));
    }

    #[test]
    fn json_roundtrip_preserves_set() {
        let set = PreferenceSet::from_options(vec![
            PrivacyOption::EnableNavigation(true),
            PrivacyOption::AccuracyFloorMeters(120.0),
            PrivacyOption::MinRefreshIntervalSeconds(60.0),
        ])
        .unwrap();

        let restored = PreferenceSet::from_json(&set.to_json().unwrap()).unwrap();
        assert_eq!(restored, set);
    }

    #[test]
    fn from_json_accepts_integer_numbers() {
        let set = PreferenceSet::from_json(r#"[{"kind":"accuracy","value":100}]"#).unwrap();
        assert!((set.accuracy_floor_meters() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn from_json_rejects_type_mismatch() {
        let result = PreferenceSet::from_json(r#"[{"kind":"navigation","value":12}]"#);
        assert!(matches!(result, Err(PreferenceError::Serialization(_))));
    }

    #[test]
    fn from_json_rejects_corrupted_input() {
        assert!(PreferenceSet::from_json("{not json").is_err());
        assert!(matches!(
            PreferenceSet::from_json("[]"),
            Err(PreferenceError::Empty)
        ));
    }

    #[test]
    fn use_case_kinds_are_boolean() {
        for use_case in UseCase::ALL {
            assert_eq!(use_case.kind().data_type(), OptionDataType::Boolean);
        }
    }
}
