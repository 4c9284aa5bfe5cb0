// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain layer: immutable configuration values and the pure access decision.

pub mod config;
pub mod credentials;
pub mod engine;
pub mod listener;
pub mod policy;
