// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Radial mind-map layout.
//!
//! Turns a node tree into canvas positions (root at the center, level-1 branches on four
//! fixed directions, deeper levels continuing outwards), merges manual overrides on top, and
//! derives the curved parent→child connectors.

pub mod config;
pub mod connectors;
pub mod geometry;
pub mod overrides;
pub mod radial;

pub use config::LayoutConfig;
pub use connectors::{synthesize_connectors, ConnectorColor, CurveDescriptor};
pub use geometry::Point;
pub use overrides::{NodeOverride, OverrideStore};
pub use radial::{compute_radial_positions, layout_mind_map, MindMapLayout, Position};
