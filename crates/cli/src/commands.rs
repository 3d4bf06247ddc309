use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter into a SQL fragment and its parameters
    Compile {
        #[arg(long, help = "Entity whose catalog resolves field names")]
        entity: String,

        #[arg(long, help = "Target dialect: mysql, postgres or sqlite")]
        dialect: String,

        #[arg(
            long,
            default_value_t = 0,
            help = "Number of parameters already bound before the fragment"
        )]
        offset: usize,

        #[arg(long, help = "Print the JSON on a single line")]
        compact: bool,

        /// Filter expression, e.g. 'tag == "math" && pinned'
        expression: String,
    },
    /// Check a filter without printing the SQL
    Validate {
        #[arg(long, help = "Entity whose catalog resolves field names")]
        entity: String,

        #[arg(long, default_value = "sqlite", help = "Dialect to validate against")]
        dialect: String,

        expression: String,
    },
    /// List the fields an entity's filters may reference
    Fields {
        #[arg(long)]
        entity: String,

        #[arg(long, help = "Print the catalog as JSON instead of a table")]
        json: bool,
    },
}
