/// The first-line header that marks a Databricks notebook source file.
pub struct Header;

impl Header {
    pub const LITERAL: &'static str = "# Databricks notebook source";

    /// Exact match after trimming surrounding whitespace.
    pub fn matches(line: &str) -> bool {
        line.trim() == Self::LITERAL
    }
}
