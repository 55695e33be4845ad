//! Migration: students, teachers, courses, classes and the records that
//! hang off a (student, class) pair.
//!
//! Students and classes cascade to their enrollments, grades and
//! attendance. Teachers and courses referenced by a class cannot be deleted.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn version<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).integer().not_null().default(1).to_owned()
}

fn student_class_fks(
    table: impl IntoIden + Copy + 'static,
    student_col: impl IntoIden + Copy + 'static,
    class_col: impl IntoIden + Copy + 'static,
    prefix: &str,
) -> [ForeignKeyCreateStatement; 2] {
    [
        ForeignKey::create()
            .name(format!("fk_{}_student_id", prefix))
            .from(table, student_col)
            .to(Students::Table, Students::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .to_owned(),
        ForeignKey::create()
            .name(format!("fk_{}_class_id", prefix))
            .from(table, class_col)
            .to(Classes::Table, Classes::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .to_owned(),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Students
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(&mut id(Students::Id))
                    .col(ColumnDef::new(Students::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(Students::LastName).string_len(50).not_null())
                    .col(ColumnDef::new(Students::DateOfBirth).date().null())
                    .col(&mut version(Students::Version))
                    .to_owned(),
            )
            .await?;

        // Teachers
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(&mut id(Teachers::Id))
                    .col(ColumnDef::new(Teachers::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(Teachers::LastName).string_len(50).not_null())
                    .col(&mut version(Teachers::Version))
                    .to_owned(),
            )
            .await?;

        // Courses
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(&mut id(Courses::Id))
                    .col(ColumnDef::new(Courses::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Courses::Code)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Credits).integer().not_null())
                    .col(&mut version(Courses::Version))
                    .to_owned(),
            )
            .await?;

        // Classes
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(&mut id(Classes::Id))
                    .col(ColumnDef::new(Classes::TeacherId).integer().null())
                    .col(ColumnDef::new(Classes::CourseId).integer().null())
                    .col(ColumnDef::new(Classes::Time).time().null())
                    .col(ColumnDef::new(Classes::Day).string_len(10).null())
                    .col(&mut version(Classes::Version))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_classes_teacher_id")
                            .from(Classes::Table, Classes::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_classes_course_id")
                            .from(Classes::Table, Classes::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        for (col, name) in [
            (Classes::TeacherId, "idx_classes_teacher_id"),
            (Classes::CourseId, "idx_classes_course_id"),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Classes::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        // Enrollments
        let [mut student_fk, mut class_fk] = student_class_fks(
            Enrollments::Table,
            Enrollments::StudentId,
            Enrollments::ClassId,
            "enrollments",
        );
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(&mut id(Enrollments::Id))
                    .col(ColumnDef::new(Enrollments::StudentId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::ClassId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::Grade).string_len(2).null())
                    .col(&mut version(Enrollments::Version))
                    .foreign_key(&mut student_fk)
                    .foreign_key(&mut class_fk)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_student_class")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::ClassId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_class_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::ClassId)
                    .to_owned(),
            )
            .await?;

        // Grades
        let [mut student_fk, mut class_fk] =
            student_class_fks(Grades::Table, Grades::StudentId, Grades::ClassId, "grades");
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(&mut id(Grades::Id))
                    .col(ColumnDef::new(Grades::StudentId).integer().not_null())
                    .col(ColumnDef::new(Grades::ClassId).integer().not_null())
                    .col(ColumnDef::new(Grades::AssessmentType).string_len(20).not_null())
                    .col(ColumnDef::new(Grades::Score).double().not_null())
                    .col(
                        ColumnDef::new(Grades::DateRecorded)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Grades::AcademicYear).string_len(4).not_null())
                    .col(&mut version(Grades::Version))
                    .foreign_key(&mut student_fk)
                    .foreign_key(&mut class_fk)
                    .to_owned(),
            )
            .await?;

        for (col, name) in [
            (Grades::StudentId, "idx_grades_student_id"),
            (Grades::ClassId, "idx_grades_class_id"),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Grades::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        // Attendance
        let [mut student_fk, mut class_fk] = student_class_fks(
            Attendances::Table,
            Attendances::StudentId,
            Attendances::ClassId,
            "attendances",
        );
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(&mut id(Attendances::Id))
                    .col(ColumnDef::new(Attendances::StudentId).integer().not_null())
                    .col(ColumnDef::new(Attendances::ClassId).integer().not_null())
                    .col(ColumnDef::new(Attendances::Date).date().not_null())
                    .col(
                        ColumnDef::new(Attendances::Status)
                            .string_len(10)
                            .not_null()
                            .default("Absent"),
                    )
                    .col(&mut version(Attendances::Version))
                    .foreign_key(&mut student_fk)
                    .foreign_key(&mut class_fk)
                    .to_owned(),
            )
            .await?;

        for (col, name) in [
            (Attendances::StudentId, "idx_attendances_student_id"),
            (Attendances::ClassId, "idx_attendances_class_id"),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Attendances::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Students {
    Table,
    Id,
    FirstName,
    LastName,
    DateOfBirth,
    Version,
}

#[derive(Iden, Clone, Copy)]
enum Teachers {
    Table,
    Id,
    FirstName,
    LastName,
    Version,
}

#[derive(Iden, Clone, Copy)]
enum Courses {
    Table,
    Id,
    Name,
    Code,
    Credits,
    Version,
}

#[derive(Iden, Clone, Copy)]
enum Classes {
    Table,
    Id,
    TeacherId,
    CourseId,
    Time,
    Day,
    Version,
}

#[derive(Iden, Clone, Copy)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    ClassId,
    Grade,
    Version,
}

#[derive(Iden, Clone, Copy)]
enum Grades {
    Table,
    Id,
    StudentId,
    ClassId,
    AssessmentType,
    Score,
    DateRecorded,
    AcademicYear,
    Version,
}

#[derive(Iden, Clone, Copy)]
enum Attendances {
    Table,
    Id,
    StudentId,
    ClassId,
    Date,
    Status,
    Version,
}
