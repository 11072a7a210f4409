//! Short-lived region/crop memory used to interpret follow-up input.

/// Last region and crop the user mentioned in this session.
///
/// Lives only as long as the process. It is passed explicitly into the
/// classifier so any prior state can be injected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMemory {
    region: Option<String>,
    crop: Option<String>,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known region/crop pair
    pub fn with_pair(region: impl Into<String>, crop: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            crop: Some(crop.into()),
        }
    }

    /// Overwrite both remembered values
    pub fn remember_pair(&mut self, region: impl Into<String>, crop: impl Into<String>) {
        self.region = Some(region.into());
        self.crop = Some(crop.into());
    }

    /// Overwrite only the remembered crop; the region is left as-is
    pub fn remember_crop(&mut self, crop: impl Into<String>) {
        self.crop = Some(crop.into());
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn crop(&self) -> Option<&str> {
        self.crop.as_deref()
    }

    /// Both values, when a full pair has been seen
    pub fn pair(&self) -> Option<(&str, &str)> {
        Some((self.region()?, self.crop()?))
    }
}
