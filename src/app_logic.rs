/*
 * This module provides the application logic layer, centered around
 * `SearchController`, which acts as the Presenter for the search form.
 * Unit tests for `SearchController` are in `handler_tests.rs`.
 */
pub mod handler;
pub mod ui_constants;

#[cfg(test)]
mod handler_tests;
