use crate::cli::PlaceholdersArgs;
use crate::report::write_placeholders;
use std::io::Read;

pub fn run(args: PlaceholdersArgs) -> anyhow::Result<()> {
    let queries = if args.queries.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;

        if buf.trim().is_empty() {
            anyhow::bail!("no SQL provided (pass SQL arguments or pipe SQL to stdin)");
        }
        vec![buf]
    } else {
        args.queries
    };

    let found: Vec<_> = queries
        .into_iter()
        .map(|sql| {
            let placeholders = sqlargs::scan_placeholders(&sql);
            (sql, placeholders)
        })
        .collect();

    let stdout = std::io::stdout();
    write_placeholders(&mut stdout.lock(), args.format, &found)
}
