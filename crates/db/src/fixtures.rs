use crate::DbPool;

/// Deterministic demo dataset used by the demo server and the tests.
///
/// Seeding is idempotent: rows are keyed by their unique business ids and
/// re-running the seed leaves an already-seeded database unchanged.
struct SeedCustomer {
    id: i64,
    entityid: &'static str,
    companyname: &'static str,
    balance: f64,
    state: &'static str,
}

const SEED_CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer {
        id: 1,
        entityid: "CUST-001",
        companyname: "Pacific Coast Traders (California)",
        balance: 12_450.00,
        state: "CA",
    },
    SeedCustomer {
        id: 2,
        entityid: "CUST-002",
        companyname: "Golden Gate Logistics (California)",
        balance: 0.0,
        state: "CA",
    },
    SeedCustomer {
        id: 3,
        entityid: "CUST-003",
        companyname: "Cascade Outfitters (Oregon)",
        balance: 3_200.50,
        state: "OR",
    },
    SeedCustomer {
        id: 4,
        entityid: "CUST-004",
        companyname: "Desert Sun Supply (Arizona)",
        balance: 780.25,
        state: "AZ",
    },
    SeedCustomer {
        id: 5,
        entityid: "CUST-005",
        companyname: "Evergreen Analytics (Washington)",
        balance: 22_010.75,
        state: "WA",
    },
];

const TRANSACTION_COUNT: i64 = 25;
const TRANSACTION_TYPES: &[&str] = &["invoice", "payment", "credit_memo"];
const TRANSACTION_STATUSES: &[&str] = &["open", "paid", "overdue"];

pub async fn seed_demo_data(pool: &DbPool) -> Result<(), sqlx::Error> {
    for customer in SEED_CUSTOMERS {
        sqlx::query(
            "INSERT OR IGNORE INTO customers (id, entityid, companyname, balance)
             VALUES (?, ?, ?, ?)",
        )
        .bind(customer.id)
        .bind(customer.entityid)
        .bind(format!("{} [{}]", customer.companyname, customer.state))
        .bind(customer.balance)
        .execute(pool)
        .await?;
    }

    for index in 0..TRANSACTION_COUNT {
        let tranid = format!("TXN-{:04}", index + 1);
        let trandate = format!("2026-{:02}-{:02}", (index % 12) + 1, (index % 27) + 1);
        let tran_type = TRANSACTION_TYPES[(index as usize) % TRANSACTION_TYPES.len()];
        let status = TRANSACTION_STATUSES[(index as usize) % TRANSACTION_STATUSES.len()];
        let entity = (index % SEED_CUSTOMERS.len() as i64) + 1;
        let total = 250.0 + (index as f64) * 37.5;

        sqlx::query(
            "INSERT OR IGNORE INTO transactions (trandate, tranid, type, total, entity, status)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(trandate)
        .bind(tranid)
        .bind(tran_type)
        .bind(total)
        .bind(entity)
        .bind(status)
        .execute(pool)
        .await?;
    }

    Ok(())
}
