//! Resource sourcing and distribution primitives.
//!
//! [`take_useless_resources`] is the engine's supply side: it drains
//! stock from stations that have no use for a resource, preferring the
//! sources that part with it most willingly (producers first, then
//! bystanders, then anyone not actively consuming it). Each rank has its
//! own price context, so buying from a producer is cheaper than prying
//! stock from a reluctant holder.
//!
//! [`give_resources`] is the outward API for dumping cargo into the
//! sector: it walks the same priority tiers as the transport engine,
//! owner's stations first, then the whole sector if trade is allowed.

use crate::config::EconomyConfig;
use crate::state::{Capability, SectorState};
use crate::systems::transport::{affordable_units, settle_trade, TransportLimit};
use sectordata::{PriceContext, ResourceCatalog, ResourceId};

/// Pull up to `wanted` units of `resource` from stations that don't need
/// it, settling each cross-owner take at the rank's price context.
/// Returns the quantity actually obtained.
///
/// The acting company's money caps the take up front at the
/// `FactoryInput` price, the highest context, so later settlements can
/// never overdraw.
pub fn take_useless_resources(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    company: &str,
    resource: ResourceId,
    wanted: u32,
    allow_trade: bool,
) -> u32 {
    let cap = affordable_units(
        state.company(company).money,
        state.resource_price(catalog, resource, PriceContext::FactoryInput),
    );
    let wanted = wanted.min(cap);
    let mut remaining = wanted;

    // Rank 1: producers of the resource part with surplus output.
    for index in 0..state.stations.len() {
        if remaining == 0 {
            break;
        }
        let station = &state.stations[index];
        if (!allow_trade && station.company != company)
            || station.has_capability(Capability::Consumer)
            || state.diplomacy.is_hostile(&station.company, company)
            || !station
                .factories
                .iter()
                .any(|f| f.has_output_resource(resource))
        {
            continue;
        }
        remaining -= take_from_station(
            state,
            catalog,
            config,
            company,
            index,
            resource,
            remaining,
            PriceContext::FactoryOutput,
        );
    }

    // Rank 2: bystanders holding stock none of their factories input.
    for index in 0..state.stations.len() {
        if remaining == 0 {
            break;
        }
        let station = &state.stations[index];
        if (!allow_trade && station.company != company)
            || station.has_capability(Capability::Consumer)
            || state.diplomacy.is_hostile(&station.company, company)
            || station
                .factories
                .iter()
                .any(|f| f.has_input_resource(resource))
        {
            continue;
        }
        remaining -= take_from_station(
            state,
            catalog,
            config,
            company,
            index,
            resource,
            remaining,
            PriceContext::Default,
        );
    }

    // Rank 3: anyone not actively consuming it, at a premium.
    for index in 0..state.stations.len() {
        if remaining == 0 {
            break;
        }
        let station = &state.stations[index];
        let actively_consuming = station.consumes_resource(catalog, resource)
            || station.factories.iter().any(|f| {
                f.active && f.needs_production && f.has_input_resource(resource)
            });
        if (!allow_trade && station.company != company)
            || actively_consuming
            || state.diplomacy.is_hostile(&station.company, company)
        {
            continue;
        }
        remaining -= take_from_station(
            state,
            catalog,
            config,
            company,
            index,
            resource,
            remaining,
            PriceContext::FactoryInput,
        );
    }

    wanted - remaining
}

fn take_from_station(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    company: &str,
    index: usize,
    resource: ResourceId,
    wanted: u32,
    context: PriceContext,
) -> u32 {
    let taken = state.stations[index].cargo.take(resource, wanted);
    if taken > 0 {
        let seller = state.stations[index].company.clone();
        let unit_price = state.resource_price(catalog, resource, context);
        settle_trade(state, config, company, &seller, taken, unit_price);
    }
    taken
}

/// Obtain `wanted` units for `company`: idle sector stock first, then
/// the company's own stations, whatever they are doing with it.
pub fn take_resources(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    company: &str,
    resource: ResourceId,
    wanted: u32,
) -> u32 {
    let mut obtained =
        take_useless_resources(state, catalog, config, company, resource, wanted, false);

    for index in 0..state.stations.len() {
        if obtained == wanted {
            break;
        }
        if state.stations[index].company != company {
            continue;
        }
        obtained += state.stations[index]
            .cargo
            .take(resource, wanted - obtained);
    }

    obtained
}

/// Distribute `quantity` units held by `company` into the sector,
/// walking the priority tiers over the owner's stations first and, if
/// stock remains and `allow_trade` is set, over everyone else's.
/// Returns the quantity actually placed.
pub fn give_resources(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    company: &str,
    resource: ResourceId,
    quantity: u32,
    allow_trade: bool,
) -> u32 {
    let mut remaining = quantity;
    do_give_resources(state, catalog, config, company, resource, &mut remaining, false);
    if remaining > 0 && allow_trade {
        do_give_resources(state, catalog, config, company, resource, &mut remaining, true);
    }
    quantity - remaining
}

fn do_give_resources(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    company: &str,
    resource: ResourceId,
    remaining: &mut u32,
    allow_trade: bool,
) {
    let factory_tiers = [
        (TransportLimit::Production(1), true),
        (TransportLimit::Production(2), true),
        (TransportLimit::CargoBay(1), true),
    ];
    for (limit, active_only) in factory_tiers {
        adaptive_give_resources(
            state, catalog, config, company, resource, remaining, limit, active_only, false,
            allow_trade,
        );
    }

    give_customer_resources(
        state,
        catalog,
        config,
        company,
        resource,
        remaining,
        TransportLimit::Production(1),
        allow_trade,
    );

    adaptive_give_resources(
        state,
        catalog,
        config,
        company,
        resource,
        remaining,
        TransportLimit::CargoBay(1),
        false,
        false,
        allow_trade,
    );

    // Last resort: dump whatever is left on Storage stations.
    adaptive_give_resources(
        state,
        catalog,
        config,
        company,
        resource,
        remaining,
        TransportLimit::Production(1),
        false,
        true,
        allow_trade,
    );
}

#[allow(clippy::too_many_arguments)]
fn adaptive_give_resources(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    company: &str,
    resource: ResourceId,
    remaining: &mut u32,
    limit: TransportLimit,
    active_only: bool,
    storage_only: bool,
    allow_trade: bool,
) {
    for index in 0..state.stations.len() {
        if *remaining == 0 {
            return;
        }

        let station = &state.stations[index];
        if (!allow_trade && station.company != company)
            || state.diplomacy.is_hostile(&station.company, company)
        {
            continue;
        }

        if storage_only {
            if !station.has_capability(Capability::Storage) {
                continue;
            }
            let unit_price = state.resource_price(catalog, resource, PriceContext::Default);
            let mut quantity = *remaining;
            let buyer = state.stations[index].company.clone();
            if buyer != company {
                quantity =
                    quantity.min(affordable_units(state.company(&buyer).money, unit_price));
            }
            let given = state.stations[index].cargo.give(resource, quantity);
            *remaining -= given;
            if given > 0 {
                settle_trade(state, config, &buyer, company, given, unit_price);
            }
            continue;
        }

        for factory_index in 0..state.stations[index].factories.len() {
            let factory = &state.stations[index].factories[factory_index];
            if active_only && (!factory.active || !factory.needs_production) {
                break;
            }

            for input_index in 0..state.stations[index].factories[factory_index].inputs.len() {
                let station = &state.stations[index];
                let slot = station.factories[factory_index].inputs[input_index];
                if slot.resource != resource {
                    continue;
                }

                let stored = station.cargo.quantity(resource);
                let needed = limit.needed_quantity(slot.quantity, station.cargo.slot_capacity());
                if stored >= needed {
                    continue;
                }

                let unit_price =
                    state.resource_price(catalog, resource, PriceContext::FactoryInput);
                let mut quantity = (*remaining)
                    .min(needed - stored)
                    .min(station.cargo.free_space_for(resource));
                let buyer = station.company.clone();
                if buyer != company {
                    quantity =
                        quantity.min(affordable_units(state.company(&buyer).money, unit_price));
                }

                let given = state.stations[index].cargo.give(resource, quantity);
                *remaining -= given;
                if given > 0 {
                    settle_trade(state, config, &buyer, company, given, unit_price);
                }

                if *remaining == 0 {
                    return;
                }
            }
        }
    }
}

/// Top up consumer stations, their target sized by what the sector's
/// population actually eats per cycle.
#[allow(clippy::too_many_arguments)]
fn give_customer_resources(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    company: &str,
    resource: ResourceId,
    remaining: &mut u32,
    limit: TransportLimit,
    allow_trade: bool,
) {
    if !catalog.is_customer_resource(resource) {
        return;
    }

    let consumed_per_cycle = state.people.resource_consumption(resource);

    for index in 0..state.stations.len() {
        if *remaining == 0 {
            return;
        }

        let station = &state.stations[index];
        if (!allow_trade && station.company != company)
            || !station.has_capability(Capability::Consumer)
            || state.diplomacy.is_hostile(&station.company, company)
        {
            continue;
        }

        let stored = station.cargo.quantity(resource);
        let needed = limit.needed_quantity(consumed_per_cycle, station.cargo.slot_capacity());
        if stored >= needed {
            continue;
        }

        let unit_price = state.resource_price(catalog, resource, PriceContext::FactoryInput);
        let mut quantity = (*remaining)
            .min(needed - stored)
            .min(station.cargo.free_space_for(resource));
        let buyer = station.company.clone();
        if buyer != company {
            quantity = quantity.min(affordable_units(state.company(&buyer).money, unit_price));
        }

        let given = state.stations[index].cargo.give(resource, quantity);
        *remaining -= given;
        if given > 0 {
            settle_trade(state, config, &buyer, company, given, unit_price);
        }
    }
}
