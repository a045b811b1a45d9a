// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the wallet guard service
//!
//! This crate provides the address, network and wallet record types that are shared
//! across the workspace, avoiding circular dependencies between the resolver, the
//! scoring engine and the HTTP layer.

pub mod address;
pub mod endpoint;
pub mod network;
pub mod wallet;

pub use address::{AddressError, WalletAddress};
pub use endpoint::{Endpoint, EndpointError};
pub use network::{ADDRESS_PREFIX, NATIVE_DECIMALS, NATIVE_DENOM, NATIVE_TICKER, Network};
pub use wallet::{
    AssetRow, CategoryBalances, CoinBalance, DisplayBalance, Liveness, TotalPolicy, WalletInfo,
    WalletSnapshot, WalletStatus,
};
