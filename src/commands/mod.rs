// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod simulate;
pub mod events;
pub mod schedule;
pub mod snapshots;
pub mod payday;
pub mod exporter;
pub mod doctor;
