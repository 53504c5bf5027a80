mod grants;
mod instances;

pub(crate) use grants::PgGrantsRepository;
pub(crate) use instances::PgInstancesRepository;
