//! Slide transition checks across a list of slides, with partial credit.

use crate::document::Document;
use crate::error::GradeError;
use crate::navigator;
use crate::normalize::{normalize_transition, text_equals_loose};
use crate::params::Parameters;
use crate::results::Detection;

/// `SlideIndexes` list, else the single `SlideIndex`.
fn target_indexes(params: &Parameters) -> Result<Vec<i64>, GradeError> {
    params
        .int_list("SlideIndexes")
        .or_else(|| params.int("SlideIndex").map(|i| vec![i]))
        .ok_or_else(|| GradeError::MissingParameter("SlideIndexes|SlideIndex".into()))
}

fn expected_effect(params: &Parameters) -> Option<String> {
    params.first_string(&["TransitionType", "TransitionScheme"])
}

struct Check<'a> {
    effect: Option<&'a str>,
    direction: Option<&'a str>,
}

/// Evaluates each listed slide independently. Out-of-range slides count
/// as non-matching.
fn check_slides(doc: &Document, indexes: &[i64], check: &Check<'_>, expected: String) -> Detection {
    let mut matched = 0;
    let mut notes = Vec::with_capacity(indexes.len());
    let mut actuals = Vec::new();
    for &index in indexes {
        let Some(slide) = navigator::optional_slide(doc, index) else {
            notes.push(format!("slide {index}: out of range"));
            continue;
        };
        let transition = navigator::transition(slide);
        let effect = transition.map(|t| t.effect.as_str()).unwrap_or("None");
        let direction = transition.and_then(|t| t.direction.as_deref());
        let effect_ok = check.effect.map_or(true, |e| {
            transition.is_some() && normalize_transition(effect) == normalize_transition(e)
        });
        let direction_ok = check
            .direction
            .map_or(true, |e| direction.is_some_and(|d| text_equals_loose(d, e)));
        let actual = match direction {
            Some(d) => format!("{effect} {d}"),
            None => effect.to_string(),
        };
        if effect_ok && direction_ok {
            matched += 1;
            notes.push(format!("slide {index}: {actual} matches"));
        } else {
            notes.push(format!("slide {index}: {actual} does not match"));
        }
        if !actuals.contains(&actual) {
            actuals.push(actual);
        }
    }
    Detection::partial(matched, indexes.len(), expected, actuals.join(", "))
        .with_details(notes.join("; "))
}

pub fn slide_transition_effect(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let indexes = target_indexes(params)?;
    let expected = expected_effect(params)
        .ok_or_else(|| GradeError::MissingParameter("TransitionType|TransitionScheme".into()))?;
    let check = Check {
        effect: Some(&expected),
        direction: None,
    };
    Ok(check_slides(doc, &indexes, &check, expected.clone()))
}

pub fn slide_transition_mode(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let indexes = target_indexes(params)?;
    let effect = expected_effect(params);
    let direction = params.string("TransitionDirection");
    if effect.is_none() && direction.is_none() {
        return Err(GradeError::MissingParameter(
            "TransitionType|TransitionScheme|TransitionDirection".into(),
        ));
    }
    let expected = [effect.as_deref(), direction.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let check = Check {
        effect: effect.as_deref(),
        direction: direction.as_deref(),
    };
    Ok(check_slides(doc, &indexes, &check, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Slide, Transition};
    use crate::results::{Credit, Outcome};

    fn four_slides() -> Document {
        Document::new(vec![
            Slide::default().with_transition("Fade"),
            Slide::default().with_transition("fade"),
            Slide::default().with_transition("Push"),
            Slide::default().with_transition("ppEffectFade"),
        ])
    }

    #[test]
    fn three_of_four_slides_match() {
        let doc = four_slides();
        let p = Parameters::new()
            .with("SlideIndexes", "1,2,3,4")
            .with("TransitionType", "淡出");
        let d = slide_transition_effect(&doc, &p).unwrap();
        assert_eq!(d.credit, Credit::Partial { matched: 3, of: 4 });
        assert_eq!(d.outcome, Outcome::NotMatched);
    }

    #[test]
    fn all_listed_slides_match() {
        let doc = four_slides();
        let p = Parameters::new()
            .with("SlideIndexes", "1,2")
            .with("TransitionScheme", "Fade");
        let d = slide_transition_effect(&doc, &p).unwrap();
        assert_eq!(d.outcome, Outcome::Matched);
        assert_eq!(d.credit, Credit::Partial { matched: 2, of: 2 });
    }

    #[test]
    fn out_of_range_slide_counts_against() {
        let doc = four_slides();
        let p = Parameters::new()
            .with("SlideIndexes", "1,9")
            .with("TransitionType", "Fade");
        let d = slide_transition_effect(&doc, &p).unwrap();
        assert_eq!(d.credit, Credit::Partial { matched: 1, of: 2 });
        assert!(d.details.contains("slide 9: out of range"));
    }

    #[test]
    fn missing_targets_or_effect() {
        let doc = four_slides();
        let p = Parameters::new().with("TransitionType", "Fade");
        assert!(slide_transition_effect(&doc, &p).is_err());
        let p = Parameters::new().with("SlideIndex", "1");
        assert!(slide_transition_effect(&doc, &p).is_err());
        assert!(slide_transition_mode(&doc, &p).is_err());
    }

    #[test]
    fn mode_checks_direction() {
        let mut slide = Slide::default();
        slide.transition = Some(Transition {
            effect: "Push".into(),
            direction: Some("From Left".into()),
            has_sound: false,
        });
        let doc = Document::new(vec![slide, Slide::default()]);
        let p = Parameters::new()
            .with("SlideIndex", "1")
            .with("TransitionType", "Push")
            .with("TransitionDirection", "from_left");
        assert_eq!(slide_transition_mode(&doc, &p).unwrap().outcome, Outcome::Matched);
        let p = Parameters::new()
            .with("SlideIndexes", "1,2")
            .with("TransitionDirection", "From Left");
        let d = slide_transition_mode(&doc, &p).unwrap();
        assert_eq!(d.credit, Credit::Partial { matched: 1, of: 2 });
    }
}
