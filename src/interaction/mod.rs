// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub mod command;
pub mod config;
pub mod machine;
pub mod menu;
pub mod notice;
mod reconcile;
pub mod state;
pub mod title;

pub use command::Command;
pub use config::InteractionConfig;
pub use machine::{
    CandidateUse, InteractionMachine, InteractionMode, PointerButton, PointerEvent, PointerTarget,
};
pub use menu::{ContextMenu, MenuAction};
pub use notice::{Notice, NoticeQueue, NoticeTone};
pub use state::{AppState, CandidatePurpose, PanelMode, Selection};
