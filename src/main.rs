//! # docform CLI
//!
//! Usage:
//!   docform input.json -o output.docx
//!   echo '{ ... }' | docform -o output.docx
//!   docform --example > letter.json
//!
//! Set `RUST_LOG=debug` to see what the compiler skips and why.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_letter_json());
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("✗ {}", e);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])
            .map_err(|e| format!("Failed to read input file '{}': {}", args[1], e))?
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        buf
    };

    // Parse output path
    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "output.docx".to_string());

    let docx_bytes = docform::render_json(&input)?;
    fs::write(&output_path, &docx_bytes)
        .map_err(|e| format!("Failed to write '{}': {}", output_path, e))?;
    eprintln!("✓ Written {} bytes to {}", docx_bytes.len(), output_path);
    Ok(())
}

fn example_letter_json() -> &'static str {
    r##"{
  "type": "DOCUMENT",
  "props": {
    "title": "Quarterly Report",
    "creator": "docform",
    "keywords": ["report", "quarterly"],
    "language": "en-US",
    "style": { "fontFamily": "Calibri" }
  },
  "children": [
    {
      "type": "PAGE",
      "props": {
        "size": "LETTER",
        "style": { "padding": "1in", "fontSize": 11 }
      },
      "children": [
        {
          "type": "HEADER",
          "children": [
            {
              "type": "TEXT",
              "props": { "style": { "textAlign": "right", "fontSize": 9, "color": "#666666" } },
              "children": [{ "type": "TEXT_INSTANCE", "text": "Acme Corp · Confidential" }]
            }
          ]
        },
        {
          "type": "TEXT",
          "props": { "paragraph": { "heading": "Heading1" }, "style": { "fontSize": 20, "fontWeight": "bold" } },
          "children": [{ "type": "TEXT_INSTANCE", "text": "Quarterly Report" }]
        },
        {
          "type": "VIEW",
          "props": { "style": { "fontSize": 11, "lineHeight": 1.5 } },
          "children": [
            {
              "type": "TEXT",
              "props": { "style": { "marginBottom": 12, "textAlign": "justify" } },
              "children": [
                { "type": "TEXT_INSTANCE", "text": "Revenue grew " },
                {
                  "type": "TEXT",
                  "props": { "style": { "fontWeight": 700, "color": "#1A7F37" } },
                  "children": [{ "type": "TEXT_INSTANCE", "text": "18%" }]
                },
                { "type": "TEXT_INSTANCE", "text": " over the previous quarter.\nDetails follow below." }
              ]
            }
          ]
        },
        {
          "type": "TABLE",
          "props": { "style": { "width": "100%" } },
          "children": [
            {
              "type": "TABLE_ROW",
              "props": { "docx": { "tableHeader": true } },
              "children": [
                {
                  "type": "TABLE_CELL",
                  "props": { "style": { "backgroundColor": "#1F2937", "color": "#FFFFFF", "padding": 6, "fontWeight": "bold" } },
                  "children": [{ "type": "TEXT_INSTANCE", "text": "Region" }]
                },
                {
                  "type": "TABLE_CELL",
                  "props": { "style": { "backgroundColor": "#1F2937", "color": "#FFFFFF", "padding": 6, "fontWeight": "bold" } },
                  "children": [{ "type": "TEXT_INSTANCE", "text": "Revenue" }]
                }
              ]
            },
            {
              "type": "TABLE_ROW",
              "children": [
                {
                  "type": "TABLE_CELL",
                  "props": { "style": { "padding": 6, "borderBottomWidth": 1, "borderBottomColor": "#DDDDDD" } },
                  "children": [{ "type": "TEXT_INSTANCE", "text": "North America" }]
                },
                {
                  "type": "TABLE_CELL",
                  "props": { "style": { "padding": 6, "borderBottomWidth": 1, "borderBottomColor": "#DDDDDD", "textAlign": "right" } },
                  "children": [{ "type": "TEXT_INSTANCE", "text": "$1,240,000" }]
                }
              ]
            }
          ]
        },
        {
          "type": "SVG",
          "props": { "width": 120, "height": 24, "viewBox": "0 0 120 24" },
          "children": [
            { "type": "PATH", "props": { "d": "M0 12 L120 12", "stroke": "#1A7F37", "strokeWidth": 2 } }
          ]
        },
        {
          "type": "FOOTER",
          "children": [
            {
              "type": "TEXT",
              "props": { "style": { "textAlign": "center", "fontSize": 8 } },
              "children": [{ "type": "TEXT_INSTANCE", "text": "Generated with docform" }]
            }
          ]
        }
      ]
    }
  ]
}
"##
}
