use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Event formatter that wraps each field in brackets.
///
/// Format: `[TIMESTAMP]  [LEVEL] [SPANS] [TARGET: FILE:LINE]: MESSAGE`
///
/// `SPANS` lists the active spans from the root, e.g.
/// `split_dataset > class{name=cat}`, or the last target segment when the
/// event is outside any span.
pub struct BracketedFormatter;

impl<S, N> FormatEvent<S, N> for BracketedFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let now = chrono::Local::now();
        write!(writer, "[{}]  ", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))?;
        write!(writer, "[{:5}] ", metadata.level())?;

        write!(writer, "[")?;
        match ctx.event_scope() {
            Some(scope) => {
                for (i, span) in scope.from_root().enumerate() {
                    if i > 0 {
                        write!(writer, " > ")?;
                    }
                    write!(writer, "{}", span.name())?;
                    let extensions = span.extensions();
                    if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                        if !fields.is_empty() {
                            write!(writer, "{{{}}}", fields)?;
                        }
                    }
                }
            }
            None => {
                let short_target = metadata.target().rsplit("::").next().unwrap_or("unknown");
                write!(writer, "{}", short_target)?;
            }
        }
        write!(writer, "] ")?;

        if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
            write!(writer, "[{}: {}:{}]: ", metadata.target(), file, line)?;
        } else {
            write!(writer, "[{}]: ", metadata.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
