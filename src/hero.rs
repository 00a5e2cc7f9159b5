// Hero record exchanged with the REST backend
//
// The backend is the source of truth: records are created and replaced whole,
// never patched, and `id` never changes once a record exists.

use serde::{Deserialize, Serialize};

/// A single hero as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    /// Resource key and route parameter (lowercase letters, digits, hyphens)
    pub id: String,
    pub superhero: String,
    pub publisher: String,
    pub alter_ego: String,
    pub first_appearance: String,
    /// Image reference
    pub img: String,
    /// Optional alternate image reference
    #[serde(default)]
    pub alt_img: Option<String>,
}

impl Hero {
    /// One-line description used by list output
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) - {}, first appeared in {}",
            self.superhero, self.alter_ego, self.publisher, self.first_appearance
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_alt_img_deserializes_as_none() {
        let json = r#"{
            "id": "dc-flash",
            "superhero": "Flash",
            "publisher": "DC Comics",
            "alter_ego": "Jay Garrick",
            "first_appearance": "Flash Comics #1",
            "img": "dc-flash.jpg"
        }"#;

        let hero: Hero = serde_json::from_str(json).unwrap();
        assert_eq!(hero.id, "dc-flash");
        assert_eq!(hero.alt_img, None);
    }

    #[test]
    fn test_null_alt_img_serializes_as_null() {
        let hero = fixtures::batman();
        let value = serde_json::to_value(&hero).unwrap();
        assert!(value["alt_img"].is_null());
        assert_eq!(value["alter_ego"], "Bruce Wayne");
    }

    #[test]
    fn test_summary() {
        let hero = fixtures::spiderman();
        assert_eq!(
            hero.summary(),
            "Spiderman (Peter Parker) - Marvel, first appeared in Issue #1"
        );
    }
}
