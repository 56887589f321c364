// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: owns storage, the document source and the shared state, and
// exposes them to the command handlers.

pub mod app_services;
pub mod data_dir;
