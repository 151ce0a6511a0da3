//! Scenario tests for the merger
//!
//! Exercise the complete transform over temporary directories holding a mix
//! of CSV, JSON-lines and XML files.

pub mod error_handling;

use std::fs;
use std::path::{Path, PathBuf};

pub const PEOPLE_CSV: &str = "name,age,height,weight\n\
Ada,36,65,120\n\
Bob,41,70,180\n";

pub const PEOPLE_JSON: &str = "{\"name\": \"Ada\", \"age\": 36, \"height\": 65, \"weight\": 120}\n\
{\"name\": \"Cy\", \"age\": 29, \"height\": 68, \"weight\": 150}\n";

pub const PEOPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<data>
  <person>
    <name>Bob</name>
    <age>41</age>
    <height>70</height>
    <weight>180</weight>
  </person>
  <person>
    <name>Dee</name>
    <age>52</age>
    <height>62</height>
    <weight>130</weight>
  </person>
</data>
"#;

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
