// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application layer: the request pipeline and the listener supervisor.

pub mod pipeline;
pub mod supervisor;
