// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod db;
pub mod directory;
pub mod error;
pub mod models;
pub mod status;
pub mod store;
pub mod utils;
pub mod commands;
