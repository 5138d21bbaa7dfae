use super::point_of_interest::PointOfInterest;

pub type CityId = i32;

#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub description: Option<String>,
    /// Empty unless the city was loaded together with its points of interest.
    pub points_of_interest: Vec<PointOfInterest>,
}

impl City {
    pub fn new(id: CityId, name: &str, description: Option<&str>) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            points_of_interest: Vec::new(),
        }
    }

    pub fn with_points_of_interest(self, points_of_interest: Vec<PointOfInterest>) -> Self {
        Self {
            points_of_interest,
            ..self
        }
    }
}
