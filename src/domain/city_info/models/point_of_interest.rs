use super::city::CityId;
use unicode_segmentation::UnicodeSegmentation;

pub type PointOfInterestId = i32;

#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub id: PointOfInterestId,
    pub city_id: CityId,
    pub name: String,
    pub description: Option<String>,
}

impl PointOfInterest {
    /// Replaces the editable fields with the ones in `changes`.
    pub fn apply(self, changes: NewPointOfInterest) -> Self {
        Self {
            name: changes.name.into(),
            description: changes.description.map(String::from),
            ..self
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PointOfInterestValidationError {
    #[error("You should provide a name value.")]
    MissingName,
    #[error(
        "The name is too long (maximum allowed is {} characters).",
        PointOfInterestName::MAX_LENGTH
    )]
    NameTooLong,
    #[error(
        "The description is too long (maximum allowed is {} characters).",
        PointOfInterestDescription::MAX_LENGTH
    )]
    DescriptionTooLong,
    #[error("The provided description should be different from the name.")]
    DescriptionEqualsName,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PointOfInterestName(String);

impl PointOfInterestName {
    const MAX_LENGTH: usize = 50;

    pub fn parse(s: String) -> Result<PointOfInterestName, PointOfInterestValidationError> {
        if s.trim().is_empty() {
            return Err(PointOfInterestValidationError::MissingName);
        }
        if s.graphemes(true).count() > Self::MAX_LENGTH {
            return Err(PointOfInterestValidationError::NameTooLong);
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for PointOfInterestName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PointOfInterestName> for String {
    fn from(name: PointOfInterestName) -> Self {
        name.0
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct PointOfInterestDescription(String);

impl PointOfInterestDescription {
    const MAX_LENGTH: usize = 200;

    pub fn parse(s: String) -> Result<PointOfInterestDescription, PointOfInterestValidationError> {
        if s.graphemes(true).count() > Self::MAX_LENGTH {
            return Err(PointOfInterestValidationError::DescriptionTooLong);
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for PointOfInterestDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PointOfInterestDescription> for String {
    fn from(description: PointOfInterestDescription) -> Self {
        description.0
    }
}

/// Validated fields for a point of interest that is about to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPointOfInterest {
    pub name: PointOfInterestName,
    pub description: Option<PointOfInterestDescription>,
}

impl NewPointOfInterest {
    pub fn parse(
        name: String,
        description: Option<String>,
    ) -> Result<NewPointOfInterest, PointOfInterestValidationError> {
        let name = PointOfInterestName::parse(name)?;
        let name_str: &str = name.as_ref();
        if description.as_deref() == Some(name_str) {
            return Err(PointOfInterestValidationError::DescriptionEqualsName);
        }
        Ok(Self {
            name,
            description: description
                .map(PointOfInterestDescription::parse)
                .transpose()?,
        })
    }
}
