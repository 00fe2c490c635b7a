//! Reference in-memory persistence.
//!
//! A single mutex-guarded state backs every repository trait so the
//! cross-entity constraints (unique email, unique favorite pair, one
//! application per account) and cascade deletes hold across them, the way a
//! relational store would enforce them.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::accounts::domain::{
    AccountId, AccountRecord, ApplicationEntry, ApplicationId, ApplicationStatus, NewAccount,
    SellerApplication, SellerApplicationForm,
};
use super::accounts::repository::AccountRepository;
use super::favorites::domain::{FavoriteId, FavoriteRecord};
use super::favorites::repository::FavoriteRepository;
use super::inquiries::domain::{InquiryId, InquiryRecord, NewInquiry, OwnedInquiry};
use super::inquiries::repository::InquiryRepository;
use super::listings::domain::{
    ImageId, ListingStatus, NewProperty, PropertyId, PropertyImage, PropertyPatch, PropertyRecord,
};
use super::listings::repository::PropertyRepository;
use super::policy::Role;
use super::RepositoryError;

#[derive(Debug, Default)]
struct StoreState {
    accounts: BTreeMap<u64, AccountRecord>,
    properties: BTreeMap<u64, PropertyRecord>,
    favorites: BTreeMap<u64, FavoriteRecord>,
    inquiries: BTreeMap<u64, InquiryRecord>,
    next_account_id: u64,
    next_application_id: u64,
    next_property_id: u64,
    next_image_id: u64,
    next_favorite_id: u64,
    next_inquiry_id: u64,
}

fn next(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// In-memory store implementing every marketplace repository trait.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("store mutex poisoned")
    }
}

impl AccountRepository for InMemoryStore {
    fn insert(&self, account: NewAccount) -> Result<AccountRecord, RepositoryError> {
        let mut state = self.lock();
        if state
            .accounts
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(RepositoryError::Conflict);
        }

        let id = next(&mut state.next_account_id);
        let record = AccountRecord {
            id: AccountId(id),
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            role: account.role,
            is_active: account.is_active,
            is_superuser: account.is_superuser,
            date_joined: Utc::now(),
            password_hash: account.password_hash,
            seller_application: None,
        };
        state.accounts.insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        Ok(self.lock().accounts.get(&id.0).cloned())
    }

    fn fetch_by_email(&self, email: &str) -> Result<Option<AccountRecord>, RepositoryError> {
        Ok(self
            .lock()
            .accounts
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn list(&self) -> Result<Vec<AccountRecord>, RepositoryError> {
        Ok(self.lock().accounts.values().cloned().collect())
    }

    fn update_role(&self, id: AccountId, role: Role) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let account = state
            .accounts
            .get_mut(&id.0)
            .ok_or(RepositoryError::NotFound)?;
        account.role = role;
        Ok(())
    }

    fn attach_application(
        &self,
        id: AccountId,
        form: SellerApplicationForm,
    ) -> Result<SellerApplication, RepositoryError> {
        let mut state = self.lock();
        let application_id = next(&mut state.next_application_id);
        let account = state
            .accounts
            .get_mut(&id.0)
            .ok_or(RepositoryError::NotFound)?;
        if account.seller_application.is_some() {
            return Err(RepositoryError::Conflict);
        }

        let now = Utc::now();
        let application = SellerApplication {
            id: ApplicationId(application_id),
            status: ApplicationStatus::Pending,
            message: form.message,
            company_name: form.company_name,
            company_address: form.company_address,
            phone_number: form.phone_number,
            website: form.website,
            created_at: now,
            updated_at: now,
        };
        account.seller_application = Some(application.clone());
        Ok(application)
    }

    fn fetch_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationEntry>, RepositoryError> {
        Ok(self
            .lock()
            .accounts
            .values()
            .find_map(|account| match &account.seller_application {
                Some(application) if application.id == id => Some(ApplicationEntry {
                    account_id: account.id,
                    email: account.email.clone(),
                    application: application.clone(),
                }),
                _ => None,
            }))
    }

    fn list_applications(&self) -> Result<Vec<ApplicationEntry>, RepositoryError> {
        Ok(self
            .lock()
            .accounts
            .values()
            .filter_map(|account| {
                account
                    .seller_application
                    .as_ref()
                    .map(|application| ApplicationEntry {
                        account_id: account.id,
                        email: account.email.clone(),
                        application: application.clone(),
                    })
            })
            .collect())
    }

    fn update_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let application = state
            .accounts
            .values_mut()
            .filter_map(|account| account.seller_application.as_mut())
            .find(|application| application.id == id)
            .ok_or(RepositoryError::NotFound)?;
        application.status = status;
        application.updated_at = Utc::now();
        Ok(())
    }
}

impl PropertyRepository for InMemoryStore {
    fn insert(&self, property: NewProperty) -> Result<PropertyRecord, RepositoryError> {
        let mut state = self.lock();
        let id = next(&mut state.next_property_id);
        let images = property
            .image_urls
            .into_iter()
            .map(|url| PropertyImage {
                id: ImageId(next(&mut state.next_image_id)),
                url,
            })
            .collect();

        let now = Utc::now();
        let record = PropertyRecord {
            id: PropertyId(id),
            owner: property.owner,
            title: property.draft.title,
            description: property.draft.description,
            price: property.draft.price,
            location: property.draft.location,
            bedrooms: property.draft.bedrooms,
            bathrooms: property.draft.bathrooms,
            space: property.draft.space,
            property_type: property.draft.property_type,
            purpose: property.draft.purpose,
            status: ListingStatus::default(),
            is_published: false,
            images,
            created_at: now,
            updated_at: now,
        };
        state.properties.insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: PropertyId) -> Result<Option<PropertyRecord>, RepositoryError> {
        Ok(self.lock().properties.get(&id.0).cloned())
    }

    fn list(&self) -> Result<Vec<PropertyRecord>, RepositoryError> {
        let mut properties: Vec<_> = self.lock().properties.values().cloned().collect();
        properties.sort_by(|a, b| (b.created_at, b.id.0).cmp(&(a.created_at, a.id.0)));
        Ok(properties)
    }

    fn list_by_owner(&self, owner: AccountId) -> Result<Vec<PropertyRecord>, RepositoryError> {
        let mut properties: Vec<_> = self
            .lock()
            .properties
            .values()
            .filter(|property| property.owner == owner)
            .cloned()
            .collect();
        properties.sort_by(|a, b| (b.created_at, b.id.0).cmp(&(a.created_at, a.id.0)));
        Ok(properties)
    }

    fn update(
        &self,
        id: PropertyId,
        patch: PropertyPatch,
    ) -> Result<PropertyRecord, RepositoryError> {
        let mut state = self.lock();
        let property = state
            .properties
            .get_mut(&id.0)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(title) = patch.title {
            property.title = title;
        }
        if let Some(description) = patch.description {
            property.description = description;
        }
        if let Some(price) = patch.price {
            property.price = price;
        }
        if let Some(location) = patch.location {
            property.location = location;
        }
        if let Some(bedrooms) = patch.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = patch.bathrooms {
            property.bathrooms = bathrooms;
        }
        if let Some(space) = patch.space {
            property.space = space;
        }
        if let Some(property_type) = patch.property_type {
            property.property_type = property_type;
        }
        if let Some(purpose) = patch.purpose {
            property.purpose = purpose;
        }
        if let Some(is_published) = patch.is_published {
            property.is_published = is_published;
        }
        property.updated_at = Utc::now();
        Ok(property.clone())
    }

    fn update_status(&self, id: PropertyId, status: ListingStatus) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let property = state
            .properties
            .get_mut(&id.0)
            .ok_or(RepositoryError::NotFound)?;
        property.status = status;
        property.updated_at = Utc::now();
        Ok(())
    }

    fn delete(&self, id: PropertyId) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        state
            .properties
            .remove(&id.0)
            .ok_or(RepositoryError::NotFound)?;
        state.favorites.retain(|_, favorite| favorite.property != id);
        state.inquiries.retain(|_, inquiry| inquiry.property != id);
        Ok(())
    }
}

impl FavoriteRepository for InMemoryStore {
    fn insert(
        &self,
        account: AccountId,
        property: PropertyId,
    ) -> Result<FavoriteRecord, RepositoryError> {
        let mut state = self.lock();
        if state
            .favorites
            .values()
            .any(|favorite| favorite.account == account && favorite.property == property)
        {
            return Err(RepositoryError::Conflict);
        }

        let id = next(&mut state.next_favorite_id);
        let record = FavoriteRecord {
            id: FavoriteId(id),
            account,
            property,
        };
        state.favorites.insert(id, record);
        Ok(record)
    }

    fn find(
        &self,
        account: AccountId,
        property: PropertyId,
    ) -> Result<Option<FavoriteRecord>, RepositoryError> {
        Ok(self
            .lock()
            .favorites
            .values()
            .find(|favorite| favorite.account == account && favorite.property == property)
            .copied())
    }

    fn remove(&self, account: AccountId, property: PropertyId) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let id = state
            .favorites
            .iter()
            .find(|(_, favorite)| favorite.account == account && favorite.property == property)
            .map(|(id, _)| *id)
            .ok_or(RepositoryError::NotFound)?;
        state.favorites.remove(&id);
        Ok(())
    }

    fn list_by_account(&self, account: AccountId) -> Result<Vec<FavoriteRecord>, RepositoryError> {
        Ok(self
            .lock()
            .favorites
            .values()
            .filter(|favorite| favorite.account == account)
            .copied()
            .collect())
    }
}

impl InquiryRepository for InMemoryStore {
    fn insert(&self, inquiry: NewInquiry) -> Result<InquiryRecord, RepositoryError> {
        let mut state = self.lock();
        let id = next(&mut state.next_inquiry_id);
        let record = InquiryRecord {
            id: InquiryId(id),
            requester: inquiry.requester,
            property: inquiry.property,
            message: inquiry.message,
            contact_number: inquiry.contact_number,
            created_at: Utc::now(),
        };
        state.inquiries.insert(id, record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<OwnedInquiry>, RepositoryError> {
        let state = self.lock();
        // Cascade delete keeps every inquiry's property present.
        Ok(state
            .inquiries
            .values()
            .filter_map(|inquiry| {
                state
                    .properties
                    .get(&inquiry.property.0)
                    .map(|property| OwnedInquiry {
                        inquiry: inquiry.clone(),
                        property_owner: property.owner,
                    })
            })
            .collect())
    }
}
