use std::{io, path::Path};

use csv::StringRecord;

use crate::{
    error::GraphError,
    route::{RouteNameParser, RouteRecord},
};

pub const ROUTE_NAME_COLUMN: &str = "route_long_name";

/// Columns appended to every row of the cleaned table. Input columns with
/// these names are replaced.
pub const DERIVED_COLUMNS: [&str; 3] = ["origin", "destination", "waypoint"];

/// Reader settings for routes tables. Rows shorter than the header are
/// accepted and their missing cells read as empty.
pub fn routes_reader() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.flexible(true);
    builder
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    pub headers: StringRecord,
    pub records: Vec<RouteRecord>,
}

impl RouteTable {
    pub fn from_path(path: &Path, parser: &RouteNameParser) -> Result<Self, GraphError> {
        log::info!("Loading routes from {:?}", path);
        Self::from_csv(routes_reader().from_path(path)?, parser)
    }

    pub fn from_csv<R: io::Read>(
        mut reader: csv::Reader<R>,
        parser: &RouteNameParser,
    ) -> Result<Self, GraphError> {
        let source_headers = reader.headers()?.clone();

        let Some(name_column) = source_headers
            .iter()
            .position(|header| header == ROUTE_NAME_COLUMN)
        else {
            return Err(GraphError::MissingSchemaField {
                column: ROUTE_NAME_COLUMN.to_string(),
            });
        };

        let passthrough: Vec<usize> = source_headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !DERIVED_COLUMNS.contains(header))
            .map(|(position, _)| position)
            .collect();

        let headers: StringRecord = passthrough
            .iter()
            .filter_map(|&position| source_headers.get(position))
            .collect();

        let mut records = vec![];
        for row in reader.records() {
            let row = row?;
            let fields: StringRecord = passthrough
                .iter()
                .map(|&position| row.get(position).unwrap_or_default())
                .collect();
            records.push(RouteRecord::new(fields, row.get(name_column), parser));
        }

        log::debug!("Loaded {} route records", records.len());
        Ok(Self { headers, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn unparsed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.has_name() && !record.is_parsed())
            .count()
    }

    /// Drops rows without a route name. Rows whose name did not parse are kept.
    pub fn clean(self) -> Self {
        let Self { headers, records } = self;
        let records: Vec<RouteRecord> = records
            .into_iter()
            .filter(RouteRecord::has_name)
            .collect();

        Self { headers, records }
    }

    pub fn write_csv<W: io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), GraphError> {
        let mut headers = self.headers.clone();
        for column in DERIVED_COLUMNS {
            headers.push_field(column);
        }
        writer.write_record(&headers)?;

        for record in &self.records {
            let mut row = record.fields.clone();
            row.push_field(record.origin().unwrap_or_default());
            row.push_field(record.destination().unwrap_or_default());
            row.push_field(record.waypoint().unwrap_or_default());
            writer.write_record(&row)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(data: &str) -> Result<RouteTable, GraphError> {
        let parser = RouteNameParser::new().unwrap();
        RouteTable::from_csv(routes_reader().from_reader(data.as_bytes()), &parser)
    }

    fn to_csv(table: &RouteTable) -> String {
        let mut writer = csv::Writer::from_writer(vec![]);
        table.write_csv(&mut writer).unwrap();
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn missing_route_name_column_is_reported() {
        let error = load("route_id,route_short_name\nT1,North Shore\n").unwrap_err();
        assert!(matches!(
            error,
            GraphError::MissingSchemaField { column } if column == ROUTE_NAME_COLUMN
        ));
    }

    #[test]
    fn clean_drops_empty_names_and_keeps_unparsed() {
        let table = load(
            "route_id,route_long_name\n\
             T1,Central to Parramatta\n\
             T2,\n\
             T3,Airport Link\n\
             T4,Central to Parramatta via Strathfield\n",
        )
        .unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.unparsed_count(), 1);

        let cleaned = table.clean();
        let ids: Vec<&str> = cleaned
            .records
            .iter()
            .filter_map(|record| record.fields.get(0))
            .collect();
        assert_eq!(ids, vec!["T1", "T3", "T4"]);
        assert_eq!(cleaned.records[2].waypoint(), Some("Strathfield"));
    }

    #[test]
    fn writes_passthrough_then_derived_columns() {
        let table = load(
            "route_id,route_long_name,route_color\n\
             T1,Central to Parramatta,F99D1C\n\
             T3,Airport Link,005AA3\n",
        )
        .unwrap()
        .clean();

        assert_eq!(
            to_csv(&table),
            "route_id,route_long_name,route_color,origin,destination,waypoint\n\
             T1,Central to Parramatta,F99D1C,Central,Parramatta,\n\
             T3,Airport Link,005AA3,,,\n"
        );
    }

    #[test]
    fn existing_derived_columns_are_replaced() {
        let table = load(
            "origin,route_long_name\n\
             stale,Central to Parramatta via Strathfield\n",
        )
        .unwrap();

        assert_eq!(table.headers, StringRecord::from(vec!["route_long_name"]));
        assert_eq!(
            to_csv(&table),
            "route_long_name,origin,destination,waypoint\n\
             Central to Parramatta via Strathfield,Central,Parramatta,Strathfield\n"
        );
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let table = load(
            "route_id,route_long_name,route_color\n\
             T1,Central to Parramatta\n\
             T2\n",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.records[1].has_name());

        let cleaned = table.clean();
        assert_eq!(
            to_csv(&cleaned),
            "route_id,route_long_name,route_color,origin,destination,waypoint\n\
             T1,Central to Parramatta,,Central,Parramatta,\n"
        );
    }

    #[test]
    fn whitespace_name_is_kept_as_unparsed() {
        let table = load("route_id,route_long_name\nT1,   \n").unwrap().clean();
        assert_eq!(table.len(), 1);
        assert_eq!(table.unparsed_count(), 1);
    }
}
