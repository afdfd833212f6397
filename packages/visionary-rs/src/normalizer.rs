//! Maps raw service responses onto the display model.
//!
//! Normalization never fails: every section of a response is optional and
//! missing sections become empty collections or `None`.
use visionary_vision::{ImageAnalysis, ObjectEntry, PersonEntry, ReadResult, TagEntry};

use crate::model::{AnalysisResult, Caption, DetectedObject, DetectedPerson, Tag};

/// People at or below this confidence are dropped as display noise.
pub const PERSON_CONFIDENCE_THRESHOLD: f64 = 0.2;

/// Name given to objects the service returned without a tag.
pub const UNKNOWN_OBJECT_NAME: &str = "Unknown";

/// Round a confidence to 2 decimal places, to the nearest hundredth of the
/// exact stored value with ties going to the even digit (`0.125` -> `0.12`).
pub fn round_confidence(value: f64) -> f64 {
    let scaled = value * 100.0;
    // exact error of the multiplication
    let residual = value.mul_add(100.0, -scaled);

    let mut rounded = scaled.round_ties_even();
    if (scaled - rounded).abs() == 0.5 && residual != 0.0 {
        // the product only landed on a tie through rounding
        rounded = if residual > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        };
    }

    rounded / 100.0
}

pub fn normalize(analysis: &ImageAnalysis) -> AnalysisResult {
    let tags = analysis
        .tags
        .as_ref()
        .map(|tags| tags.values.iter().map(normalize_tag).collect())
        .unwrap_or_default();

    let objects = analysis
        .objects
        .as_ref()
        .map(|objects| objects.values.iter().map(normalize_object).collect())
        .unwrap_or_default();

    let people = analysis
        .people
        .as_ref()
        .map(|people| people.values.iter().filter_map(normalize_person).collect())
        .unwrap_or_default();

    let caption = analysis.caption.as_ref().map(|caption| Caption {
        text: caption.text.clone(),
        confidence: round_confidence(caption.confidence),
    });

    AnalysisResult {
        tags,
        objects,
        people,
        caption,
    }
}

/// Join every line of every text block, in service order, one per line.
pub fn extract_text(read: Option<&ReadResult>) -> String {
    let Some(read) = read else {
        return String::new();
    };

    read.blocks
        .iter()
        .flat_map(|block| block.lines.iter())
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn normalize_tag(tag: &TagEntry) -> Tag {
    Tag {
        name: tag.name.clone(),
        confidence: round_confidence(tag.confidence),
    }
}

fn normalize_object(object: &ObjectEntry) -> DetectedObject {
    match object.tags.first() {
        Some(tag) => DetectedObject {
            name: tag.name.clone(),
            confidence: Some(round_confidence(tag.confidence)),
            bounding_box: object.bounding_box,
        },
        None => DetectedObject {
            name: UNKNOWN_OBJECT_NAME.to_string(),
            confidence: None,
            bounding_box: object.bounding_box,
        },
    }
}

fn normalize_person(person: &PersonEntry) -> Option<DetectedPerson> {
    (person.confidence > PERSON_CONFIDENCE_THRESHOLD).then(|| DetectedPerson {
        bounding_box: person.bounding_box,
        confidence: round_confidence(person.confidence),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use visionary_vision::{
        BoundingBox, CaptionResult, ObjectsResult, PeopleResult, TagsResult, TextBlock, TextLine,
    };

    fn person(confidence: f64) -> PersonEntry {
        PersonEntry {
            bounding_box: BoundingBox::new(0, 0, 10, 10),
            confidence,
        }
    }

    #[test]
    fn test_empty_analysis() {
        let result = normalize(&ImageAnalysis::default());
        assert!(result.tags.is_empty());
        assert!(result.objects.is_empty());
        assert!(result.people.is_empty());
        assert!(result.caption.is_none());
        assert!(result.is_empty());
    }

    #[test]
    fn test_present_but_empty_collections() {
        let analysis = ImageAnalysis {
            tags: Some(TagsResult::default()),
            objects: Some(ObjectsResult::default()),
            people: Some(PeopleResult::default()),
            ..Default::default()
        };
        assert!(normalize(&analysis).is_empty());
    }

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.86666), 0.87);
        assert_eq!(round_confidence(0.5), 0.5);
        assert_eq!(round_confidence(0.994), 0.99);
        assert_eq!(round_confidence(0.0), 0.0);
        assert_eq!(round_confidence(1.0), 1.0);
    }

    #[test]
    fn test_round_confidence_ties() {
        // exact tie: goes to the even digit
        assert_eq!(round_confidence(0.125), 0.12);
        assert_eq!(round_confidence(0.375), 0.38);
        // 0.865 is stored just below the tie
        assert_eq!(round_confidence(0.865), 0.86);
        // 0.115 is stored just above the tie
        assert_eq!(round_confidence(0.115), 0.12);
    }

    #[test]
    fn test_person_just_above_threshold_from_json() {
        let analysis: ImageAnalysis = serde_json::from_str(
            r#"{"peopleResult":{"values":[
                {"boundingBox":{"x":0,"y":0,"w":5,"h":5},"confidence":0.20000000001},
                {"boundingBox":{"x":0,"y":0,"w":5,"h":5},"confidence":0.2}
            ]}}"#,
        )
        .unwrap();

        let people = normalize(&analysis).people;
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].confidence, 0.2);
    }

    #[test]
    fn test_tags_are_rounded_and_keep_order() {
        let analysis = ImageAnalysis {
            tags: Some(TagsResult {
                values: vec![
                    TagEntry {
                        name: "outdoor".into(),
                        confidence: 0.86666,
                    },
                    TagEntry {
                        name: "tree".into(),
                        confidence: 0.991,
                    },
                ],
            }),
            ..Default::default()
        };

        let result = normalize(&analysis);
        assert_eq!(
            result.tags,
            vec![
                Tag {
                    name: "outdoor".into(),
                    confidence: 0.87
                },
                Tag {
                    name: "tree".into(),
                    confidence: 0.99
                },
            ]
        );
    }

    #[test]
    fn test_object_uses_first_tag() {
        let analysis = ImageAnalysis {
            objects: Some(ObjectsResult {
                values: vec![ObjectEntry {
                    bounding_box: BoundingBox::new(10, 20, 30, 40),
                    tags: vec![
                        TagEntry {
                            name: "cat".into(),
                            confidence: 0.7345,
                        },
                        TagEntry {
                            name: "animal".into(),
                            confidence: 0.9,
                        },
                    ],
                }],
            }),
            ..Default::default()
        };

        let object = &normalize(&analysis).objects[0];
        assert_eq!(object.name, "cat");
        assert_eq!(object.confidence, Some(0.73));
        assert_eq!(object.bounding_box, BoundingBox::new(10, 20, 30, 40));
    }

    #[test]
    fn test_object_without_tag_is_unknown() {
        let analysis = ImageAnalysis {
            objects: Some(ObjectsResult {
                values: vec![ObjectEntry {
                    bounding_box: BoundingBox::new(1, 2, 3, 4),
                    tags: vec![],
                }],
            }),
            ..Default::default()
        };

        let object = &normalize(&analysis).objects[0];
        assert_eq!(object.name, UNKNOWN_OBJECT_NAME);
        assert_eq!(object.confidence, None);
    }

    #[test]
    fn test_object_with_zero_confidence_keeps_it() {
        let analysis = ImageAnalysis {
            objects: Some(ObjectsResult {
                values: vec![ObjectEntry {
                    bounding_box: BoundingBox::new(1, 2, 3, 4),
                    tags: vec![TagEntry {
                        name: "blur".into(),
                        confidence: 0.0,
                    }],
                }],
            }),
            ..Default::default()
        };

        assert_eq!(normalize(&analysis).objects[0].confidence, Some(0.0));
    }

    #[test]
    fn test_person_threshold_boundary() {
        let analysis = ImageAnalysis {
            people: Some(PeopleResult {
                values: vec![person(0.2), person(0.2000001), person(0.1), person(0.95)],
            }),
            ..Default::default()
        };

        let people = normalize(&analysis).people;
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].confidence, 0.2);
        assert_eq!(people[1].confidence, 0.95);
    }

    #[test]
    fn test_caption_is_rounded() {
        let analysis = ImageAnalysis {
            caption: Some(CaptionResult {
                text: "a person riding a bike".into(),
                confidence: 0.81234,
            }),
            ..Default::default()
        };

        assert_eq!(
            normalize(&analysis).caption,
            Some(Caption {
                text: "a person riding a bike".into(),
                confidence: 0.81
            })
        );
    }

    #[test]
    fn test_extract_text_joins_blocks() {
        let read = ReadResult {
            blocks: vec![
                TextBlock {
                    lines: vec![TextLine::new("A"), TextLine::new("B")],
                },
                TextBlock {
                    lines: vec![TextLine::new("C"), TextLine::new("D")],
                },
            ],
        };
        assert_eq!(extract_text(Some(&read)), "A\nB\nC\nD");
    }

    #[test]
    fn test_extract_text_trims() {
        let read = ReadResult {
            blocks: vec![TextBlock {
                lines: vec![TextLine::new("  total: 42"), TextLine::new("thanks  ")],
            }],
        };
        assert_eq!(extract_text(Some(&read)), "total: 42\nthanks");
    }

    #[test]
    fn test_extract_text_absent_or_empty() {
        assert_eq!(extract_text(None), "");
        assert_eq!(extract_text(Some(&ReadResult::default())), "");
        let read = ReadResult {
            blocks: vec![TextBlock::default()],
        };
        assert_eq!(extract_text(Some(&read)), "");
    }
}
