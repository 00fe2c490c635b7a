use std::sync::Arc;

use clap::Args;
use estate_market::auth::{hash_password, TokenIssuer};
use estate_market::config::AuthConfig;
use estate_market::error::AppError;
use estate_market::marketplace::accounts::{
    AccountRecord, AccountRepository, AccountService, ApplicationStatus, NewAccount, Registration,
    SellerApplicationForm,
};
use estate_market::marketplace::favorites::{FavoriteOutcome, FavoriteService};
use estate_market::marketplace::inquiries::{CreateInquiry, InquiryService};
use estate_market::marketplace::listings::{
    CreateListing, ImageUpload, ListingService, ListingStatus, PropertyPatch,
};
use estate_market::marketplace::memory::InMemoryStore;
use estate_market::marketplace::policy::{Actor, AuthorizationPolicy, Role};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Email used for the seeded superadmin account
    #[arg(long, default_value = "root@estate-market.dev")]
    pub(crate) superadmin_email: String,
    /// Skip the favorites/inquiries portion of the demo
    #[arg(long)]
    pub(crate) skip_engagement: bool,
}

struct Demo {
    store: InMemoryStore,
    accounts: AccountService<InMemoryStore>,
    listings: ListingService<InMemoryStore, crate::infra::InMemoryImageStore>,
    favorites: FavoriteService<InMemoryStore, InMemoryStore>,
    inquiries: InquiryService<InMemoryStore, InMemoryStore>,
}

fn step(name: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Runtime(format!("{name}: {err}"))
}

fn actor_for(account: &AccountRecord) -> Actor {
    Actor {
        account_id: account.id,
        email: account.email.clone(),
        first_name: account.first_name.clone(),
        role: account.role,
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let demo = build_demo();

    println!("== Accounts ==");
    let superadmin = seed(&demo.store, &args.superadmin_email, Role::Superadmin)?;
    let admin = seed(&demo.store, "admin@estate-market.dev", Role::Admin)?;
    println!("seeded superadmin {} and admin {}", superadmin.email, admin.email);

    let buyer = demo
        .accounts
        .register(Registration {
            email: "casey@estate-market.dev".to_string(),
            password: "hunter-42".to_string(),
            first_name: "Casey".to_string(),
            last_name: "Lee".to_string(),
        })
        .map_err(|err| step("register buyer", err))?;
    println!(
        "registered {} with default role '{}'",
        buyer.email,
        buyer.role.label()
    );

    println!();
    println!("== Seller onboarding ==");
    let buyer_record = demo
        .store
        .fetch(buyer.id)
        .map_err(|err| step("fetch buyer", err))?
        .ok_or_else(|| AppError::Runtime("registered buyer vanished".to_string()))?;

    let application = demo
        .accounts
        .submit_application(
            &actor_for(&buyer_record),
            SellerApplicationForm {
                message: "We list family homes across the city.".to_string(),
                company_name: Some("Lakeview Homes".to_string()),
                ..Default::default()
            },
        )
        .map_err(|err| step("submit application", err))?;
    println!("application #{} submitted ({})", application.id.0, application.status.label());

    match demo
        .accounts
        .submit_application(&actor_for(&buyer_record), SellerApplicationForm::default())
    {
        Err(err) => println!("second submission rejected: {err}"),
        Ok(_) => return Err(AppError::Runtime("duplicate application accepted".to_string())),
    }

    demo.accounts
        .decide_application(&actor_for(&admin), application.id, ApplicationStatus::Approved)
        .map_err(|err| step("approve application", err))?;
    let seller = demo
        .store
        .fetch(buyer.id)
        .map_err(|err| step("fetch seller", err))?
        .ok_or_else(|| AppError::Runtime("promoted seller vanished".to_string()))?;
    println!(
        "application approved; {} now holds role '{}'",
        seller.email,
        seller.role.label()
    );

    println!();
    println!("== Listings ==");
    let property = demo
        .listings
        .create(
            &actor_for(&seller),
            CreateListing {
                property_data: serde_json::json!({
                    "title": "Two-bed flat in Dhanmondi",
                    "description": "Bright corner unit with a balcony.",
                    "price": 250_000,
                    "location": "Dhanmondi, Dhaka",
                    "bedrooms": 2,
                    "bathrooms": 1,
                    "space": 900,
                    "purpose": "For Sale",
                }),
                images: vec![
                    ImageUpload {
                        file_name: "front.jpg".to_string(),
                        content: "aGVsbG8=".to_string(),
                    },
                    ImageUpload {
                        file_name: "kitchen.jpg".to_string(),
                        content: "d29ybGQ=".to_string(),
                    },
                ],
            },
        )
        .map_err(|err| step("create listing", err))?;
    println!(
        "listing #{} created: status {}, published {}, {} image(s)",
        property.id.0,
        property.status.label(),
        property.is_published,
        property.images.len()
    );

    demo.listings
        .decide(&actor_for(&admin), property.id, ListingStatus::Approved)
        .map_err(|err| step("approve listing", err))?;
    let published = demo
        .listings
        .update(
            &actor_for(&seller),
            property.id,
            PropertyPatch {
                is_published: Some(true),
                ..Default::default()
            },
        )
        .map_err(|err| step("publish listing", err))?;
    println!(
        "listing approved and published (status {}, published {})",
        published.status.label(),
        published.is_published
    );

    if !args.skip_engagement {
        println!();
        println!("== Engagement ==");
        let browser = seed(&demo.store, "robin@estate-market.dev", Role::Buyer)?;

        for attempt in 1..=2 {
            match demo
                .favorites
                .add(&actor_for(&browser), property.id)
                .map_err(|err| step("add favorite", err))?
            {
                FavoriteOutcome::Created(favorite) => {
                    println!("attempt {attempt}: favorite #{} created", favorite.id.0)
                }
                FavoriteOutcome::Existing(favorite) => {
                    println!("attempt {attempt}: favorite #{} already stored", favorite.id.0)
                }
            }
        }

        demo.inquiries
            .create(
                &actor_for(&browser),
                CreateInquiry {
                    property: property.id.0,
                    message: "Is the flat still available next month?".to_string(),
                    contact_number: "01700000000".to_string(),
                },
            )
            .map_err(|err| step("create inquiry", err))?;

        for account in [&superadmin, &seller, &browser] {
            let visible = demo
                .inquiries
                .list(&actor_for(account))
                .map_err(|err| step("list inquiries", err))?;
            println!(
                "{} ({}) sees {} inquiry(ies)",
                account.email,
                account.role.label(),
                visible.len()
            );
        }
    }

    println!();
    println!("demo complete");
    Ok(())
}

fn build_demo() -> Demo {
    let store = InMemoryStore::default();
    let policy = Arc::new(AuthorizationPolicy::default());
    let tokens = Arc::new(TokenIssuer::new(&AuthConfig {
        token_secret: "demo-secret".to_string(),
        access_ttl_secs: 3600,
    }));
    let repository = Arc::new(store.clone());

    Demo {
        store,
        accounts: AccountService::new(repository.clone(), policy.clone(), tokens.clone()),
        listings: ListingService::new(
            repository.clone(),
            Arc::new(crate::infra::InMemoryImageStore::default()),
            policy,
            tokens.clone(),
        ),
        favorites: FavoriteService::new(repository.clone(), repository.clone(), tokens.clone()),
        inquiries: InquiryService::new(repository.clone(), repository, tokens),
    }
}

fn seed(store: &InMemoryStore, email: &str, role: Role) -> Result<AccountRecord, AppError> {
    let password_hash =
        hash_password("demo-password").map_err(|err| AppError::Runtime(err.to_string()))?;
    store
        .insert(NewAccount {
            email: email.to_string(),
            first_name: role.label().to_string(),
            last_name: String::new(),
            role,
            is_active: true,
            is_superuser: role == Role::Superadmin,
            password_hash,
        })
        .map_err(|err| AppError::Runtime(format!("failed to seed {email}: {err}")))
}
