//! Per-core field projection (`fl` parameter)

use std::collections::HashMap;

/// Requested when a core has no entry in the table
pub const ALL_FIELDS: &str = "*";

const GENOME_FIELDS: &str = "taxon_lineage_ids,collection_date,collection_year,habitat,genome_id,genome_name,other_typing,body_sample_site,contigs,patric_cds,publication,genome_status,isolation_site,temperature_range,isolation_country,common_name,order,longitude,strain,chromosomes,biovar,biosample_accession,isolation_comments,cell_shape,p2_genome_id,genbank_accessions,culture_collection,refseq_accessions,genus,antimicrobial_resistance_evidence,organism_name,additional_metadata,altitude,sequencing_platform,host_gender,latitude,refseq_cds,other_clinical,sra_accession,body_sample_subsite,genome_length,public,owner,user_read,user_write,reference_genome,oxygen_requirement,taxon_lineage_names,gram_stain,gc_content,antimicrobial_resistance,class,pathovar,sporulation,ncbi_project_id,owner,sequencing_depth,salinity,optimal_temperature,comments,disease,geographic_location,taxon_id,plasmids,kingdom,assembly_method,sequencing_centers,host_age,phylum,depth,mlst,species,assembly_accession,host_health,serovar,motility,refseq_project_id,type_strain,completion_date,sequencing_status,family,bioproject_accession,host_name,isolation_source,date_inserted,date_modified";

const GENOME_FEATURE_FIELDS: &str = "feature_id,genome_id,na_length,genome_name,alt_locus_tag,p2_feature_id,aa_sequence_md5,accession,segments,strand,public,property,sequence_id,refseq_locus_tag,end,aa_length,annotation,owner,product,na_sequence_md5,gene,start,pos_group,go,taxon_id,patric_id,feature_type,protein_id,figfam_id,plfam_id,pgfam_id,location,gene_id,date_inserted,date_modified";

const FEATURE_SEQUENCE_FIELDS: &str = "md5,sequence_type,sequence,date_inserted,date_modified";

const BUILTIN: &[(&str, &str)] = &[
    ("genome", GENOME_FIELDS),
    ("genome_feature", GENOME_FEATURE_FIELDS),
    ("feature_sequence", FEATURE_SEQUENCE_FIELDS),
];

/// Lookup table from core name to a comma separated field list.
///
/// Cores without an entry request every stored field.
#[derive(Clone, Debug, Default)]
pub struct FieldProjection {
    fields: HashMap<String, String>,
}

impl FieldProjection {
    /// Table with the field lists of the known cores
    pub fn builtin() -> FieldProjection {
        FieldProjection {
            fields: BUILTIN
                .iter()
                .map(|(core, fl)| (core.to_string(), fl.to_string()))
                .collect(),
        }
    }

    /// Replace (or add) the field list of one core
    pub fn with_override(mut self, core: &str, field_list: &str) -> FieldProjection {
        self.fields.insert(core.to_string(), field_list.to_string());
        self
    }

    pub fn field_list(&self, core: &str) -> &str {
        self.fields.get(core).map(String::as_str).unwrap_or(ALL_FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_cores_have_field_lists() {
        let table = FieldProjection::builtin();
        assert_eq!(
            table.field_list("feature_sequence"),
            "md5,sequence_type,sequence,date_inserted,date_modified"
        );
        assert!(table.field_list("genome").starts_with("taxon_lineage_ids,"));
        assert!(table.field_list("genome_feature").starts_with("feature_id,"));
    }

    #[test]
    fn unknown_core_requests_everything() {
        assert_eq!(FieldProjection::builtin().field_list("taxonomy"), "*");
        assert_eq!(FieldProjection::default().field_list("genome"), "*");
    }

    #[test]
    fn override_wins() {
        let table = FieldProjection::builtin().with_override("genome", "genome_id");
        assert_eq!(table.field_list("genome"), "genome_id");
        assert!(table.field_list("genome_feature").starts_with("feature_id,"));
    }
}
