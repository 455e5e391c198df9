// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_databricks_notebook(cells: usize) -> String {
    let mut content = String::from("# Databricks notebook source\n");
    for i in 0..cells {
        content.push_str("\n# COMMAND ----------\n\n");
        match i % 4 {
            0 => content.push_str(&format!(
                "# MAGIC %md\n# MAGIC ## Step {i}\n# MAGIC\n# MAGIC Loads partition {i}.\n"
            )),
            1 => content.push_str(&format!(
                "df_{i} = spark.read.table(\"sales\")\ndf_{i}.filter(\"id > {i}\").count()\n"
            )),
            2 => content.push_str(&format!(
                "# MAGIC %sql\n# MAGIC SELECT * FROM sales WHERE id = {i}\n"
            )),
            _ => content.push_str("# MAGIC %sh\n# MAGIC ls -la /dbfs/tmp\n"),
        }
    }
    content
}

#[allow(dead_code)]
pub fn generate_percent_notebook(cells: usize) -> String {
    let mut content = String::new();
    for i in 0..cells {
        if i % 3 == 0 {
            content.push_str(&format!("# %% [markdown]\n# Section {i}\n\n"));
        } else {
            content.push_str(&format!("# %% Cell {i}\nvalue_{i} = {i} * 2\n\n"));
        }
    }
    content
}
