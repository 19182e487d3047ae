//! Public lead intake from the website quote form, plus the dropdown
//! data the form reads before submitting.

use log::{info, warn};

use crate::domain::catalog::Assignment;
use crate::domain::estimate::{Estimate, MoveType};
use crate::forms::intake::LeadForm;
use crate::geo::GeoResolver;
use crate::repository::{
    CatalogReader, CustomerReader, CustomerWriter, EstimateReader, EstimateWriter, HubReader,
    RateReader, SizingReader, SizingWriter, SourceReader,
};
use crate::services::calculation::recalculate;
use crate::services::customers::{find_or_create_customer, resolve_lead_source};
use crate::services::locks::lock_estimate;
use crate::services::{ServiceError, ServiceResult};

/// Stores a website lead as a `new lead` estimate and prices it by
/// residence size.
///
/// The named source must exist in the hub. The customer is reused when
/// the email or phone is already on file. Past validation a lead always
/// gets stored: an unknown residence size or a failed pricing
/// run is logged and the estimate is returned as saved.
pub fn submit_lead<R>(
    repo: &R,
    geo: Option<&dyn GeoResolver>,
    hub_id: i32,
    form: LeadForm,
) -> ServiceResult<Estimate>
where
    R: EstimateReader
        + EstimateWriter
        + SizingReader
        + SizingWriter
        + CatalogReader
        + RateReader
        + HubReader
        + CustomerReader
        + CustomerWriter
        + SourceReader
        + ?Sized,
{
    let submission = form
        .into_submission(hub_id)
        .map_err(|err| ServiceError::Validation(err.to_string()))?;
    let source = resolve_lead_source(repo, hub_id, &submission.source)?;

    let new_customer = submission.customer.with_source_id(source.id);
    let customer = find_or_create_customer(repo, &new_customer)?;
    let new_estimate = submission.estimate.with_customer_id(customer.id);

    let created = repo
        .create_estimate(&new_estimate)
        .map_err(ServiceError::from)?;
    info!(
        "Received lead estimate {} for customer {} in hub {}",
        created.id, customer.id, hub_id
    );

    let _lock = lock_estimate(hub_id, created.id);

    if let Some(description) = submission.residence_size.as_deref() {
        match repo
            .find_residence_size(hub_id, description)
            .map_err(ServiceError::from)?
        {
            Some(size) => {
                repo.replace_residence_sizes(
                    created.id,
                    hub_id,
                    &[Assignment {
                        id: size.id,
                        quantity: 1,
                    }],
                )
                .map_err(ServiceError::from)?;
            }
            None => warn!(
                "Lead estimate {} names unknown residence size `{}`",
                created.id, description
            ),
        }
    }

    match recalculate(repo, geo, hub_id, created.id, true, None) {
        Ok(priced) => Ok(priced),
        Err(err) => {
            warn!("Lead estimate {} left unpriced: {}", created.id, err);
            Ok(created)
        }
    }
}

/// Names of the hub's public lead sources, sorted by name.
pub fn list_public_sources<R>(repo: &R, hub_id: i32) -> ServiceResult<Vec<String>>
where
    R: SourceReader + ?Sized,
{
    let sources = repo
        .list_lead_sources(hub_id, true)
        .map_err(ServiceError::from)?;
    Ok(sources.into_iter().map(|source| source.name).collect())
}

/// Residence size descriptions offered for a move type. Commercial moves
/// have none.
pub fn list_intake_residence_sizes<R>(
    repo: &R,
    hub_id: i32,
    move_type: &str,
) -> ServiceResult<Vec<String>>
where
    R: CatalogReader + ?Sized,
{
    let move_type = move_type
        .trim()
        .to_lowercase()
        .parse::<MoveType>()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;
    let types = move_type.residence_size_types();
    if types.is_empty() {
        return Ok(Vec::new());
    }

    let mut sizes: Vec<_> = repo
        .list_residence_sizes(hub_id)
        .map_err(ServiceError::from)?
        .into_iter()
        .filter_map(|size| {
            types
                .iter()
                .position(|size_type| *size_type == size.size_type)
                .map(|rank| (rank, size))
        })
        .collect();
    sizes.sort_by_key(|(rank, size)| (*rank, size.id));

    Ok(sizes
        .into_iter()
        .map(|(_, size)| size.size_description)
        .collect())
}
