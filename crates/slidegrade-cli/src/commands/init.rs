//! The `slidegrade init` command.

use std::path::Path;

use anyhow::Result;

/// Write `contents` to `path` unless it already exists.
fn create(path: &str, contents: &str) -> Result<()> {
    let path = Path::new(path);
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    println!("Created {}", path.display());
    Ok(())
}

pub fn execute() -> Result<()> {
    create("slidegrade.toml", SAMPLE_CONFIG)?;
    create("exams/example.toml", EXAMPLE_EXAM)?;
    create("decks/example.json", EXAMPLE_DECK)?;

    println!("\nNext steps:");
    println!("  1. Run: slidegrade validate --exam exams/example.toml");
    println!("  2. Run: slidegrade score --exam exams/example.toml --document decks/example.json");
    println!("  3. Run: slidegrade batch --exam exams/example.toml decks/");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# slidegrade configuration

# Credit for checks that can only confirm an attribute is present: "none" or "full"
unverifiable_credit = "none"

# Documents graded concurrently by `slidegrade batch`
parallelism = 4

# Per-document time limit in seconds (omit for no limit)
# document_timeout_secs = 30

# Rename authoring-tool parameter keys (SlideNumber -> SlideIndex, ...)
normalize_parameter_keys = true
"#;

const EXAMPLE_EXAM: &str = r#"[exam]
id = "ppt-basics"
name = "Presentation Basics"
description = "Build and format a three-slide quarterly review deck"

[[modules]]
id = "ppt"
name = "PowerPoint"
type = "powerpoint"

[[modules.questions]]
id = "q1"
title = "Structure"

[[modules.questions.operation_points]]
id = "slide-count"
name = "InsertSlide"
score = 2.0
parameters = [{ name = "ExpectedSlideCount", value = 3 }]

[[modules.questions.operation_points]]
id = "layout"
name = "SetSlideLayout"
score = 2.0
parameters = [
    { name = "SlideNumber", value = 2 },
    { name = "LayoutType", value = "Title and Content" },
]

[[modules.questions.operation_points]]
id = "table"
name = "InsertTable"
score = 1.0
parameters = [{ name = "SlideNumber", value = 2 }]

[[modules.questions]]
id = "q2"
title = "Content and effects"

[[modules.questions.operation_points]]
id = "summary-text"
name = "幻灯片插入文本内容"
score = 3.0
parameters = [
    { name = "SlideNumber", value = 1 },
    { name = "TextContent", value = "Quarterly Summary" },
]

[[modules.questions.operation_points]]
id = "transitions"
name = "SlideTransitionEffect"
score = 3.0
parameters = [
    { name = "SlideNumbers", value = "1,2,3" },
    { name = "TransitionEffect", value = "Fade" },
]

[[modules.questions.operation_points]]
id = "theme"
name = "ApplyTheme"
score = 1.0
parameters = [{ name = "ThemeName", value = "Ion" }]

[[modules.questions.operation_points]]
id = "animation"
name = "SetAnimationStyle"
score = 1.0
parameters = [{ name = "AnimationStyle", value = "Fly In" }]
"#;

const EXAMPLE_DECK: &str = r#"{
  "theme": { "name": "Ion" },
  "slides": [
    {
      "layout": { "name": "Title Slide" },
      "transition": { "effect": "Fade" },
      "shapes": [
        {
          "name": "Title 1",
          "kind": { "type": "textbox" },
          "placeholder": "title",
          "transform": { "x": 838200, "y": 365125, "cx": 10515600, "cy": 1325563 },
          "text": {
            "paragraphs": [
              {
                "alignment": "ctr",
                "runs": [
                  {
                    "text": "Quarterly Review",
                    "props": { "font": "Arial", "size": 4400, "bold": true, "color": "1F4E79" }
                  }
                ]
              }
            ]
          }
        }
      ]
    },
    {
      "layout": { "name": "Title and Content" },
      "transition": { "effect": "Fade", "direction": "Left" },
      "notes": "Mention the north region first.",
      "shapes": [
        {
          "name": "Title 1",
          "kind": { "type": "textbox" },
          "placeholder": "title",
          "text": { "paragraphs": [ { "runs": [ { "text": "Quarterly Summary" } ] } ] }
        },
        {
          "name": "Picture 2",
          "kind": { "type": "picture" },
          "transform": { "x": 1000000, "y": 2000000, "cx": 3000000, "cy": 2000000 }
        },
        {
          "name": "Table 3",
          "kind": {
            "type": "table",
            "rows": [["Region", "Sales"], ["North", "120"], ["South", "95"]],
            "style": "Medium Style 2 - Accent 1"
          }
        }
      ]
    },
    {
      "layout": { "name": "Title Only" },
      "transition": { "effect": "Push" },
      "shapes": [
        {
          "name": "Title 1",
          "kind": { "type": "textbox" },
          "placeholder": "title",
          "text": { "paragraphs": [ { "runs": [ { "text": "Questions" } ] } ] }
        },
        {
          "name": "Footer 2",
          "kind": { "type": "textbox" },
          "placeholder": "footer",
          "text": { "paragraphs": [ { "runs": [ { "text": "Confidential" } ] } ] }
        }
      ]
    }
  ]
}
"#;
