// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindweave: radial mind-map layout and interaction engine.
//!
//! A project is a tree of questions refined step by step. The engine lays the tree out on a
//! pixel canvas, turns pointer input into selections, drags and workflow commands, and keeps
//! its cached tree in sync with a remote project service. The `tui` module hosts it in a
//! terminal.

pub mod draft;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod sync;
pub mod tui;
