//! Integration tests for jobsweep
//!
//! Crawler tests run against wiremock servers serving canned search pages;
//! engine tests drive `JobSearch` with in-process crawlers.

mod bdjobs_tests;
mod linkedin_tests;
mod search_tests;
