use super::*;

mod daily_batch;
mod normalization;
