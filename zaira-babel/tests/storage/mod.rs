//! Storage format tests

mod fragments;
