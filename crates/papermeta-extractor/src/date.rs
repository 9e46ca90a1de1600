//! Publication date resolution

use crate::{Annotation, EntityKind};

/// First DATE entity in the whole-document annotation
pub fn resolve_date(annotation: &Annotation) -> Option<String> {
    annotation
        .first_of_kind(EntityKind::Date)
        .map(|entity| entity.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entity;

    #[test]
    fn test_first_date_wins() {
        let annotation = Annotation::new(
            vec![
                Entity::new("Jane Doe", EntityKind::Person, 0, 8),
                Entity::new("June 2023", EntityKind::Date, 10, 19),
                Entity::new("2019", EntityKind::Date, 40, 44),
            ],
            vec![],
        );
        assert_eq!(resolve_date(&annotation), Some("June 2023".to_string()));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(resolve_date(&Annotation::default()), None);
    }
}
