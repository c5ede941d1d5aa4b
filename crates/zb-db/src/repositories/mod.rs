// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic operations).

pub mod attempt;
pub mod mastery;
pub mod question;
pub mod test_result;
pub mod topic;
pub mod user;
