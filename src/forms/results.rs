use crate::{
    forms::{
        Field, Form, FormData, FormErrors, InputForm, Layout, LayoutItem, ValidationError,
        DATE_FORMAT,
    },
    schema::ResultsRange,
};
use chrono::{Duration, NaiveDate};

/// Choosing the date range of the results report.
#[derive(Clone, Debug)]
pub struct ResultsForm {
    form: Form,
}

impl ResultsForm {
    /// Builds the form. The range starts a month before `today` and spans three months.
    pub fn new(today: NaiveDate) -> ResultsForm {
        let start_date = today - Duration::days(30);
        let end_date = start_date + Duration::days(3 * 30);
        let form = Form::new(
            vec![
                Field::date("start_date", "Von TT.MM.YYYY", DATE_FORMAT)
                    .initial(start_date.format(DATE_FORMAT)),
                Field::date("end_date", "Bis TT.MM.YYYY", DATE_FORMAT)
                    .initial(end_date.format(DATE_FORMAT)),
            ],
            Layout::new(vec![
                "start_date".into(),
                "end_date".into(),
                LayoutItem::html(
                    "<button class=\"btn btn-success\" type=\"submit\" name=\"save\" \
                     style=\"margin:0.5em 0.5em 0.5em 1em\">\
                     <span class=\"glyphicon glyphicon-chevron-right\"></span> Weiter</button> ",
                ),
                LayoutItem::html("<br>"),
            ]),
        );
        ResultsForm { form }
    }
}

impl InputForm for ResultsForm {
    type Cleaned = ResultsRange;

    fn form(&self) -> &Form {
        &self.form
    }

    fn validate(&self, data: &FormData) -> Result<ResultsRange, FormErrors> {
        let mut bound = self.form.bind(data);
        let start_date = bound.date("start_date");
        let end_date = bound.date("end_date");
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                bound.check(Err(ValidationError::new(
                    "Das Ende darf nicht vor dem Anfang liegen!",
                    "end_before_start",
                )));
            }
        }
        bound.finish(|| {
            Some(ResultsRange {
                start_date: start_date?,
                end_date: end_date?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn initial_range() {
        let form = ResultsForm::new(day(2019, 3, 31));
        assert_eq!(form.form().field("start_date").unwrap().initial, vec!["01.03.2019"]);
        assert_eq!(form.form().field("end_date").unwrap().initial, vec!["30.05.2019"]);
        assert_eq!(form.form().layout().items().len(), 4);
    }

    #[test]
    fn validates_the_range() {
        let form = ResultsForm::new(day(2019, 3, 31));
        let data = FormData::from_pairs(vec![("start_date", "01.01.2019"), ("end_date", "31.01.2019")]);
        assert_eq!(
            form.validate(&data),
            Ok(ResultsRange {
                start_date: day(2019, 1, 1),
                end_date: day(2019, 1, 31),
            })
        );

        let data = FormData::from_pairs(vec![("start_date", "01.02.2019"), ("end_date", "31.01.2019")]);
        assert!(form.validate(&data).unwrap_err().has_code("end_before_start"));

        let data = FormData::from_pairs(vec![("start_date", "2019-01-01"), ("end_date", "31.01.2019")]);
        let errs = form.validate(&data).unwrap_err();
        assert_eq!(errs.for_field("start_date")[0].code, "invalid");
    }
}
