// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure layer: adapters around `dav-server`, the stores and rustls.

pub mod dav;
pub mod storage;
pub mod tls;
