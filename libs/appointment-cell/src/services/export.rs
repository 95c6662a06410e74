//! CSV rendering of exported appointment rows.

use shared_store::ExportRow;

const CSV_HEADER: &str = "appointment_id,date,time,duration_minutes,status,\
patient_first_name,patient_last_name,patient_date_of_birth,patient_email,patient_phone,\
doctor_first_name,doctor_last_name,doctor_specialty,\
insurance_carrier,insurance_member_id,insurance_group_id,notes";

#[derive(Debug)]
pub struct AppointmentExport {
    rows: Vec<ExportRow>,
}

impl AppointmentExport {
    pub fn new(rows: Vec<ExportRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for row in &self.rows {
            let fields = [
                row.appointment_id.to_string(),
                row.appointment_date.to_string(),
                row.appointment_time.format("%H:%M").to_string(),
                row.duration_minutes.to_string(),
                row.status.to_string(),
                row.patient_first_name.clone(),
                row.patient_last_name.clone(),
                row.patient_date_of_birth.to_string(),
                row.patient_email.clone().unwrap_or_default(),
                row.patient_phone.clone().unwrap_or_default(),
                row.doctor_first_name.clone(),
                row.doctor_last_name.clone(),
                row.doctor_specialty.clone(),
                row.insurance_carrier.clone().unwrap_or_default(),
                row.insurance_member_id.clone().unwrap_or_default(),
                row.insurance_group_id.clone().unwrap_or_default(),
                row.notes.clone().unwrap_or_default(),
            ];
            let line: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
