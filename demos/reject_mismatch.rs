//! Shows how reconciliation rejects a rendered query that injected SQL
//! into a literal region of the template.
//!
//! Run with: cargo run --example reject_mismatch

use sqlx_template_bind::{build_parameterized_query, Error};

fn main() {
    let template = "SELECT * FROM table \
                    WHERE name='Ahmed' and date='${__from:date:YYYY-MM-DD} 00:00:00' \
                    and id=$id and active=1";

    // The templating layer expanded $id into text that tries to smuggle a
    // second statement past the trailing literal.
    let injected = "SELECT * FROM table \
                    WHERE name='Ahmed' and date='2019-07-29 00:00:00' \
                    and id='0'SELECT * FROM table WHERE id=''";

    match build_parameterized_query(template, injected) {
        Ok(query) => println!("unexpected success: {}", query.prepared_sql()),
        Err(Error::Mismatch) => {
            println!("rejected: rendered SQL does not match the query template")
        }
        Err(e) => println!("error: {e}"),
    }

    // A faithful rendering of the same template is accepted, and the values
    // come back as bind parameters.
    let rendered = "SELECT * FROM table \
                    WHERE name='Ahmed' and date='2019-07-29 00:00:00' \
                    and id=7 and active=1";

    match build_parameterized_query(template, rendered) {
        Ok(query) => {
            println!("accepted:  {}", query.prepared_sql());
            println!("bind list: {:?}", query.parameters().collect::<Vec<_>>());
        }
        Err(e) => println!("error: {e}"),
    }
}
